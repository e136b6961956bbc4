//! Generate command: runs one generation round against the backend.

use std::str::FromStr;

use clap::Args;

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::models::{Direction, Opening, OpeningKind, RoomGeometry};
use crate::services::{generate_options, HttpBackend};
use crate::session::{GenerationOutcome, Session, GENERATION_FAILED_MESSAGE};

/// Opening given on the command line as `WALL:POSITION:WIDTH:HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningArg {
    /// Wall
    pub wall: Direction,
    /// Fraction along the wall
    pub position: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl FromStr for OpeningArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [wall, position, width, height] = parts.as_slice() else {
            return Err(format!("expected WALL:POSITION:WIDTH:HEIGHT, got '{s}'"));
        };

        let number = |field: &str, value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| format!("invalid {field} '{value}'"))
        };

        Ok(Self {
            wall: wall.parse().map_err(|e: anyhow::Error| e.to_string())?,
            position: number("position", *position)?,
            width: number("width", *width)?,
            height: number("height", *height)?,
        })
    }
}

impl OpeningArg {
    fn into_opening(self, kind: OpeningKind) -> anyhow::Result<Opening> {
        Opening::new(self.wall, self.position, self.width, self.height, kind)
    }
}

/// Generate design options for a room
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Room length (x extent)
    #[arg(long, default_value = "16")]
    pub length: f64,

    /// Room width (z extent)
    #[arg(long, default_value = "13")]
    pub width: f64,

    /// Door as WALL:POSITION:WIDTH:HEIGHT (repeatable)
    #[arg(long = "door", value_name = "OPENING")]
    pub doors: Vec<OpeningArg>,

    /// Window as WALL:POSITION:WIDTH:HEIGHT (repeatable)
    #[arg(long = "window", value_name = "OPENING")]
    pub windows: Vec<OpeningArg>,

    /// Room type (defaults to the configured one)
    #[arg(long, value_name = "TYPE")]
    pub room_type: Option<String>,

    /// Style variant (repeatable, defaults to the configured styles)
    #[arg(long = "style", value_name = "STYLE")]
    pub styles: Vec<String>,

    /// Backend base URL (defaults to the configured one)
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,

    /// Output the full designs as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Builds the room described by the arguments.
    pub fn room(&self) -> CliResult<RoomGeometry> {
        let mut room = RoomGeometry::new(self.length, self.width)
            .map_err(|e| CliError::validation(e.to_string()))?;

        let openings = self
            .doors
            .iter()
            .map(|d| d.into_opening(OpeningKind::Door))
            .chain(self.windows.iter().map(|w| w.into_opening(OpeningKind::Window)));
        for opening in openings {
            room = room.with_opening(opening.map_err(|e| CliError::validation(e.to_string()))?);
        }

        room.validate()
            .map_err(|e| CliError::validation(e.to_string()))?;
        Ok(room)
    }

    /// Execute the generate command
    pub async fn execute(&self) -> CliResult<()> {
        let mut config = Config::load().unwrap_or_default();
        if let Some(url) = &self.backend {
            config.backend.base_url.clone_from(url);
        }
        config
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))?;

        let room_type = self
            .room_type
            .clone()
            .unwrap_or_else(|| config.design.room_type.clone());
        let styles = if self.styles.is_empty() {
            config.design.styles.clone()
        } else {
            self.styles.clone()
        };

        let backend = HttpBackend::new(
            config.backend.base_url.clone(),
            config.backend.request_timeout(),
        )
        .map_err(|e| CliError::backend(format!("Failed to create HTTP client: {e}")))?;

        let mut session = Session::new(self.room()?);
        let ticket = session.begin_generation(&room_type, &styles);
        let result = generate_options(&backend, &ticket.requests).await;
        let details = result.as_ref().err().map(ToString::to_string);

        match session.complete_generation(ticket.epoch, result) {
            GenerationOutcome::Ready(_) => {}
            GenerationOutcome::Failed | GenerationOutcome::Stale => {
                return Err(CliError::backend(format!(
                    "{}: {}",
                    GENERATION_FAILED_MESSAGE,
                    details.unwrap_or_default()
                )));
            }
        }

        if self.json {
            let json = serde_json::to_string_pretty(session.options().candidates())
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        } else {
            for summary in session.options().summaries() {
                println!(
                    "[{}] {} ({} items, walls {}): {}",
                    summary.index,
                    summary.style.as_deref().unwrap_or("unstyled"),
                    summary.item_count,
                    summary.wall_color,
                    summary.objects.join(", ")
                );
            }
        }

        Ok(())
    }
}
