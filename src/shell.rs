//! Line-oriented front end: owns the form fields, forwards actions to the
//! controller and renders the session after each one.

use std::{fmt::Write as _, path::PathBuf};

use actix::Addr;
use anyhow::Result;
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    configs::WorkflowForm,
    dispatcher::{Cleanup, Controller, Predict, SessionSnapshot, Snapshot, Train, Upload},
    service::{DatasetFile, TrainingService},
    session::OperationKind,
};

const HELP: &str = "\
commands:
  select <path>            choose the dataset file to upload
  set layers <a,b,...>     hidden layer sizes
  set activation <name>    relu | tanh | logistic
  set optimizer <name>     adam | sgd | lbfgs
  set iterations <n>       max training iterations
  set inputs <x1,...,x5>   prediction input vector
  upload | train | predict | cleanup
  status | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    HiddenLayers,
    Activation,
    Optimizer,
    MaxIterations,
    PredictionInputs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(PathBuf),
    Set(FormField, String),
    Run(OperationKind),
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines parse to `None`.
///
/// # Errors
/// A human-readable message for unknown commands or missing arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "select" if !rest.is_empty() => Command::Select(PathBuf::from(rest)),
        "select" => return Err("usage: select <path>".into()),
        "set" => parse_set(rest)?,
        "upload" => Command::Run(OperationKind::Upload),
        "train" => Command::Run(OperationKind::Train),
        "predict" => Command::Run(OperationKind::Predict),
        "cleanup" => Command::Run(OperationKind::Cleanup),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(cmd))
}

fn parse_set(rest: &str) -> Result<Command, String> {
    let Some((field, value)) = rest.split_once(char::is_whitespace) else {
        return Err("usage: set <field> <value>".into());
    };

    let field = match field.to_ascii_lowercase().as_str() {
        "layers" | "hidden_layers" => FormField::HiddenLayers,
        "activation" => FormField::Activation,
        "optimizer" => FormField::Optimizer,
        "iterations" | "max_iter" => FormField::MaxIterations,
        "inputs" => FormField::PredictionInputs,
        other => return Err(format!("unknown field '{other}'")),
    };
    Ok(Command::Set(field, value.trim().to_string()))
}

/// Renders the session the way the single-page view lays it out: the
/// pipeline values, then one line per action with its enablement and status.
pub fn render(snapshot: &SessionSnapshot, form: &WorkflowForm) -> String {
    let state = &snapshot.state;
    let e = snapshot.enablement;
    let mut out = String::new();

    let file = form
        .selected_file
        .as_ref()
        .map_or("-", |f| f.name.as_str());
    let _ = writeln!(out, "file:       {file}");
    let _ = writeln!(out, "dataset:    {}", state.dataset_id().unwrap_or("-"));
    let _ = writeln!(out, "loss:       {}", fmt_value(state.trained_loss()));
    let _ = writeln!(out, "prediction: {}", fmt_value(state.last_prediction()));

    let rows = [
        (OperationKind::Upload, e.can_upload),
        (OperationKind::Train, e.can_train),
        (OperationKind::Predict, e.can_predict),
        (OperationKind::Cleanup, e.can_cleanup),
    ];
    for (kind, enabled) in rows {
        let mark = if enabled { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "[{mark}] {:<8} {}",
            kind.to_string(),
            state.status().get(kind)
        );
    }
    out
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"))
}

/// Interactive session state kept on the view side.
pub struct Shell<S: TrainingService + 'static> {
    controller: Addr<Controller<S>>,
    form: WorkflowForm,
}

impl<S: TrainingService + 'static> Shell<S> {
    pub fn new(controller: Addr<Controller<S>>) -> Self {
        Self {
            controller,
            form: WorkflowForm::default(),
        }
    }

    pub fn form(&self) -> &WorkflowForm {
        &self.form
    }

    /// Applies one command and returns the text to show, or `None` on quit.
    ///
    /// # Errors
    /// Only if the controller actor is gone.
    pub async fn execute(&mut self, cmd: Command) -> Result<Option<String>> {
        match cmd {
            Command::Quit => return Ok(None),
            Command::Help => return Ok(Some(HELP.to_string())),
            Command::Status => {}
            Command::Select(path) => match std::fs::read(&path) {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    self.form.selected_file = Some(DatasetFile::new(name, bytes));
                }
                Err(e) => return Ok(Some(format!("cannot read '{}': {e}", path.display()))),
            },
            Command::Set(field, value) => {
                let slot = match field {
                    FormField::HiddenLayers => &mut self.form.hidden_layers,
                    FormField::Activation => &mut self.form.activation,
                    FormField::Optimizer => &mut self.form.optimizer,
                    FormField::MaxIterations => &mut self.form.max_iterations,
                    FormField::PredictionInputs => &mut self.form.prediction_inputs,
                };
                *slot = value;
            }
            Command::Run(kind) => self.run(kind).await?,
        }

        let snapshot = self.controller.send(Snapshot).await?;
        Ok(Some(render(&snapshot, &self.form)))
    }

    /// Forwards one action. The outcome is already reflected in the session's
    /// status slots, so only mailbox failures are propagated.
    async fn run(&self, kind: OperationKind) -> Result<()> {
        let outcome = match kind {
            OperationKind::Upload => self
                .controller
                .send(Upload::from(&self.form))
                .await?
                .map(drop),
            OperationKind::Train => self
                .controller
                .send(Train::from(&self.form))
                .await?
                .map(drop),
            OperationKind::Predict => self
                .controller
                .send(Predict::from(&self.form))
                .await?
                .map(drop),
            OperationKind::Cleanup => self.controller.send(Cleanup).await?.map(drop),
        };
        if let Err(e) = outcome {
            debug!("{kind} ended with: {e}");
        }
        Ok(())
    }
}

/// Reads commands line by line until `quit` or end of input.
///
/// # Errors
/// I/O errors on either stream, or a stopped controller.
pub async fn run<S, R, W>(controller: Addr<Controller<S>>, input: R, mut output: W) -> Result<()>
where
    S: TrainingService + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut shell = Shell::new(controller);
    let mut lines = input.lines();

    output.write_all(b"type 'help' for commands\n").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(cmd)) => match shell.execute(cmd).await? {
                Some(reply) => reply,
                None => break,
            },
            Err(msg) => msg,
        };
        output.write_all(reply.as_bytes()).await?;
        if !reply.ends_with('\n') {
            output.write_all(b"\n").await?;
        }
        output.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_and_fields() {
        assert_eq!(
            parse_command("  train "),
            Ok(Some(Command::Run(OperationKind::Train)))
        );
        assert_eq!(
            parse_command("set layers 64, 32"),
            Ok(Some(Command::Set(FormField::HiddenLayers, "64, 32".into())))
        );
        assert_eq!(
            parse_command("select data/train.pkl"),
            Ok(Some(Command::Select(PathBuf::from("data/train.pkl"))))
        );
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("EXIT"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(parse_command("fit").is_err());
        assert!(parse_command("set layers").is_err());
        assert!(parse_command("set colour red").is_err());
        assert!(parse_command("select").is_err());
    }

    #[test]
    fn values_render_with_six_decimals() {
        assert_eq!(fmt_value(Some(0.000123)), "0.000123");
        assert_eq!(fmt_value(Some(42.5)), "42.500000");
        assert_eq!(fmt_value(None), "-");
    }
}
