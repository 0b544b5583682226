use crate::error::{Error, Result};

/// Index of the largest score. Ties go to the earliest index.
pub fn argmax(scores: &[f32]) -> Result<usize> {
    let (first, rest) = scores.split_first().ok_or(Error::EmptyScores)?;

    let mut max = *first;
    let mut index = 0;
    for (i, &score) in rest.iter().enumerate() {
        if score > max {
            max = score;
            index = i + 1;
        }
    }
    Ok(index)
}
