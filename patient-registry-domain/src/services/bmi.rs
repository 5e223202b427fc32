use crate::entities::patient::BmiVerdict;

/// Compute the Body Mass Index from a height in meters and a weight in
/// kilograms, together with its categorical verdict. The value is returned
/// unrounded.
pub fn compute_bmi(height_m: f64, weight_kg: f64) -> (f64, BmiVerdict) {
    let bmi = weight_kg / (height_m * height_m);
    (bmi, classify_bmi(bmi))
}

/// Classify a BMI value into its verdict band.
///
/// Bands are half-open intervals and boundary values belong to the upper
/// band: 18.5 is Normal, 25.0 is Overweight, 30.0 is Obese.
pub fn classify_bmi(bmi: f64) -> BmiVerdict {
    if bmi < 18.5 {
        BmiVerdict::Underweight
    } else if bmi < 25.0 {
        BmiVerdict::Normal
    } else if bmi < 30.0 {
        BmiVerdict::Overweight
    } else {
        BmiVerdict::Obese
    }
}
