mod patients_test;
