//! Score arithmetic shared by the course listing, detail and grading
//! endpoints. All averages are rounded to two decimal places.

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average of the two exam scores for a single enrollment.
pub(crate) fn enrollment_average(midterm_score: f64, final_score: f64) -> f64 {
    round2((midterm_score + final_score) / 2.0)
}

/// Mean of per-enrollment averages across a student's semester. An empty
/// enrollment set yields 0 rather than dividing by zero.
pub(crate) fn semester_average(averages: &[f64]) -> f64 {
    if averages.is_empty() {
        return 0.0;
    }
    round2(averages.iter().sum::<f64>() / averages.len() as f64)
}
