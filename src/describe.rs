use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{Pod, PodStatus};
use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior, Value, context};
use std::io::Write;
use tabwriter::TabWriter;

use crate::k8s::container_states;
use crate::model::{PhaseLabel, PodSummary, ResourceKind};
use crate::paint::{paint, paint_on, parse_color};
use crate::status::{paint_phase, phase_of};

const POD_TEMPLATE: &str = include_str!("../templates/pod.tmpl");

pub fn builtin_template(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Pod => POD_TEMPLATE,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateFunctions {
    entries: Vec<(&'static str, Value)>,
}

impl TemplateFunctions {
    pub fn standard() -> Self {
        Self::default()
            .with("color", Value::from_function(color))
            .with("color_bg", Value::from_function(color_bg))
            .with("phase", Value::from_function(phase))
    }

    pub fn with(mut self, name: &'static str, function: Value) -> Self {
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, function));
        self
    }
}

pub struct Describer {
    env: Environment<'static>,
}

impl Describer {
    pub fn new(functions: TemplateFunctions) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        for (name, function) in functions.entries {
            env.add_global(name, function);
        }
        Self { env }
    }

    pub fn describe<W: Write>(&self, pod: &Pod, template: &str, out: W) -> Result<()> {
        let rendered = self
            .env
            .render_str(template, context! { pod => pod })
            .context("failed to render describe template")?;

        let mut writer = TabWriter::new(out).minwidth(0).padding(2).ansi(true);
        writer
            .write_all(rendered.as_bytes())
            .context("failed to write describe output")?;
        writer.flush().context("failed to flush describe output")?;
        Ok(())
    }
}

fn color(fg: String, text: Value) -> Result<String, Error> {
    Ok(paint(template_color(&fg)?, text.to_string()).to_string())
}

fn color_bg(fg: String, bg: String, text: Value) -> Result<String, Error> {
    Ok(paint_on(template_color(&fg)?, template_color(&bg)?, text.to_string()).to_string())
}

// A raw phase string, or a pod whose phase is derived from its containers.
fn phase(pod: Value) -> Result<String, Error> {
    let label = match pod.as_str() {
        Some(raw) => PhaseLabel::from_api(raw),
        None => {
            let status = pod_status(&pod)?;
            phase_of(&PodSummary {
                containers: container_states(&status),
                ..PodSummary::default()
            })
        }
    };
    Ok(paint_phase(label).to_string())
}

fn pod_status(pod: &Value) -> Result<PodStatus, Error> {
    let status = pod.get_attr("status")?;
    if status.is_undefined() || status.is_none() {
        return Ok(PodStatus::default());
    }

    let json = serde_json::to_value(&status).map_err(|error| {
        Error::new(ErrorKind::InvalidOperation, "pod status is not serializable")
            .with_source(error)
    })?;
    serde_json::from_value(json).map_err(|error| {
        Error::new(ErrorKind::InvalidOperation, "value is not a pod").with_source(error)
    })
}

fn template_color(name: &str) -> Result<ratatui::style::Color, Error> {
    parse_color(name).map_err(|error| Error::new(ErrorKind::InvalidOperation, error.to_string()))
}
