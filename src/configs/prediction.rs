/// Fixed input dimensionality of the served model.
pub const INPUT_DIM: usize = 5;

/// A single inference request against the trained model.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub dataset_id: String,
    pub input_vector: [f64; INPUT_DIM],
}
