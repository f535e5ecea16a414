use async_trait::async_trait;
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason,
};
use serde_json::{Map, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::LyricsProvider;
use crate::core::host::LockedTrack;
use crate::error::ScriptError;

/// Metadata fields exposed to the command template.
const TEMPLATE_FIELDS: &[&str] = &[
    "artist",
    "title",
    "album",
    "album_artist",
    "track",
    "year",
    "genre",
    "path",
];

pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Runs a user-configured command and takes its stdout as the lyrics.
///
/// The command line is a Handlebars template over the track's metadata, for
/// example `lyrics-fetch {{quote artist}} {{quote title}}`. Referencing a
/// field the track lacks is a render error.
pub struct ScriptProvider {
    template: String,
    timeout: Duration,
    handlebars: Handlebars<'static>,
}

impl ScriptProvider {
    pub fn new(template: impl Into<String>, timeout: Duration) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("quote", Box::new(quote));

        Self {
            template: template.into(),
            timeout,
            handlebars,
        }
    }

    pub fn render(&self, track: &LockedTrack<'_>) -> Result<String, ScriptError> {
        if self.template.trim().is_empty() {
            return Err(ScriptError::EmptyTemplate);
        }

        let context = track.with(|track| {
            TEMPLATE_FIELDS
                .iter()
                .filter_map(|&field| {
                    track
                        .find_meta(field)
                        .map(|value| (field.to_string(), Value::String(value)))
                })
                .collect::<Map<String, Value>>()
        });

        Ok(self.handlebars.render_template(&self.template, &context)?)
    }

    pub async fn run(&self, track: &LockedTrack<'_>) -> Result<Option<String>, ScriptError> {
        let command_line = self.render(track)?;
        debug!("Running lyrics script: {}", command_line);

        let mut cmd = shell_command(&command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ScriptError::Timeout(self.timeout.as_secs()))?
            .map_err(ScriptError::Spawn)?;

        if !output.status.success() {
            return Err(ScriptError::ExitStatus(output.status.code()));
        }
        if output.stdout.is_empty() {
            return Ok(None);
        }

        String::from_utf8(output.stdout)
            .map(Some)
            .map_err(|_| ScriptError::InvalidUtf8)
    }
}

#[async_trait]
impl LyricsProvider for ScriptProvider {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn resolve(&self, track: &LockedTrack<'_>) -> Option<String> {
        match self.run(track).await {
            Ok(lyrics) => lyrics,
            Err(ScriptError::EmptyTemplate) => {
                debug!("No lyrics script configured");
                None
            }
            Err(e @ ScriptError::Template(_)) => {
                warn!("{}", e);
                None
            }
            Err(ScriptError::InvalidUtf8) => {
                warn!("Script output is not a valid UTF-8 string");
                None
            }
            Err(e) => {
                warn!("Lyrics script failed: {}", e);
                None
            }
        }
    }
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command_line);
    cmd
}

pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn quote(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| {
            RenderError::from(RenderErrorReason::Other(
                "quote expects a string parameter".to_string(),
            ))
        })?;

    out.write(&shell_quote(value))?;
    Ok(())
}
