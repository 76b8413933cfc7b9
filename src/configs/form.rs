use crate::service::DatasetFile;

/// Raw, unvalidated form fields as the user typed them.
///
/// Defaults match a typical first run: two hidden layers, ReLU, Adam, 200
/// iterations and a sample input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowForm {
    pub selected_file: Option<DatasetFile>,
    pub hidden_layers: String,
    pub activation: String,
    pub optimizer: String,
    pub max_iterations: String,
    pub prediction_inputs: String,
}

impl Default for WorkflowForm {
    fn default() -> Self {
        Self {
            selected_file: None,
            hidden_layers: "100,50".into(),
            activation: "relu".into(),
            optimizer: "adam".into(),
            max_iterations: "200".into(),
            prediction_inputs: "1.0,2.0,3.0,4.0,5.0".into(),
        }
    }
}
