//! Sequential outpainting run over a single shared canvas
//!
//! A run moves through `Planning → Painting(i) → Saved → Terminal`, with
//! validation happening before anything else in [`Outpainter::prepare`].
//! Tiles are painted strictly in plan order: every tile is cropped from the
//! canvas as left by all earlier tiles, so its overlapping border carries
//! their generated pixels as context. Each tile is attempted exactly once and
//! the first failure ends the run.

use crate::geometry::expansion::{Dimensions, Expansion, FocusPoint};
use crate::geometry::region::RegionBox;
use crate::io::configuration::{OutpaintConfig, RunGeometry, SNAPSHOT_TIMESTAMP_FORMAT};
use crate::io::error::{OutpaintError, Result, invalid_configuration, service_error};
use crate::io::image::{save_png, snapshot_path};
use crate::io::progress::ProgressReporter;
use crate::orchestration::canvas::Canvas;
use crate::planning::prompt::{
    PromptPair, PromptSelector, fallback_instruction, parse_fallback_response,
};
use crate::planning::tiles::{Tile, TilePlan, TilePlanner};
use crate::services::collaborators::{InpaintRequest, PromptRewriter, Services};
use image::RgbaImage;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Lifecycle stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Canvas, detections, prompts and plan are ready; nothing painted yet
    Planning,
    /// Tile at this plan index is being processed
    Painting(usize),
    /// The final canvas has been written
    Saved,
    /// The run is over and its canvas released
    Terminal,
    /// The tile at this plan index failed and the run stopped
    Failed(usize),
}

/// What happened to a single planned tile
#[derive(Debug)]
pub enum TileOutcome {
    /// The tile lies inside the source and needed no painting
    Skipped,
    /// The tile was generated and pasted onto the canvas
    Painted,
    /// The inpainting collaborator failed for this tile
    Failed(OutpaintError),
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Path of the final canvas
    pub output: PathBuf,
    /// Number of tiles sent to the inpainter
    pub painted: usize,
    /// Number of tiles inside the source
    pub skipped: usize,
    /// Snapshots written during the run, in order
    pub snapshots: Vec<PathBuf>,
}

/// Plans and executes one outpainting run
pub struct Outpainter<'a> {
    services: Services<'a>,
    config: OutpaintConfig,
    geometry: RunGeometry,
    expansion: Expansion,
    canvas: Canvas,
    plan: TilePlan,
    selector: PromptSelector,
    progress: Option<ProgressReporter>,
    state: RunState,
    run_timestamp: String,
    painted: usize,
    skipped: usize,
    snapshots: Vec<PathBuf>,
}

impl<'a> Outpainter<'a> {
    /// Validate, detect, place the source, resolve prompts and plan tiles
    ///
    /// Configuration is checked before any collaborator is called.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration does not fit the source image
    /// - A detector or the captioning service fails
    /// - The fallback rewrite request cannot be sent
    pub fn prepare(
        config: OutpaintConfig,
        source: &RgbaImage,
        services: Services<'a>,
    ) -> Result<Self> {
        let source_size = Dimensions::new(source.width(), source.height());
        info!("Input size: {}x{}", source_size.width, source_size.height);
        let geometry = config.validate(source_size)?;
        info!(
            "Output size: {}x{}, square {}, step {}",
            geometry.canvas.width,
            geometry.canvas.height,
            geometry.tile_size.pixels(),
            geometry.step
        );

        let detection = services.focus.detect_focus_region(source)?;
        let focus = FocusPoint::from_detection(&detection, source_size);
        info!("Center of focus: ({}, {})", focus.x, focus.y);

        let expansion = Expansion::from_focus(source_size, geometry.canvas, focus)?;
        info!(
            "Expansion: left {}, right {}, top {}, bottom {}",
            expansion.left, expansion.right, expansion.top, expansion.bottom
        );
        let planner = TilePlanner::new(
            geometry.canvas,
            source_size,
            expansion,
            geometry.tile_size,
            geometry.step,
        )?;

        let mut canvas = Canvas::new(geometry.canvas);
        canvas.paste(source, expansion.left, expansion.top);

        let regions: Vec<RegionBox> = if config.humans {
            let detected = services.regions.detect_regions(source)?;
            info!("Detected regions of interest: {detected:?}");
            detected
                .iter()
                .map(|region| region.translate(expansion.left, expansion.top))
                .collect()
        } else {
            Vec::new()
        };

        let primary = match &config.prompt {
            Some(prompt) => prompt.clone(),
            None => services.describer.describe(source, &config.prompt_model)?,
        };
        info!("Primary prompt: {primary}");

        let fallback = match &config.fallback {
            Some(fallback) => Some(fallback.clone()),
            None if config.humans && !regions.is_empty() => {
                derive_fallback(services.rewriter, &primary)?
            }
            None => None,
        };
        info!("Fallback prompt: {}", fallback.as_deref().unwrap_or(&primary));

        let plan = planner.plan();
        for (direction, tiles) in plan.directions() {
            debug!(
                "Planned {} tiles {:?}",
                direction.name(),
                tiles.iter().map(|tile| (tile.x, tile.y)).collect::<Vec<_>>()
            );
        }
        info!("Planned {} tiles", plan.len());

        Ok(Self {
            services,
            config,
            geometry,
            expansion,
            canvas,
            plan,
            selector: PromptSelector::new(PromptPair::new(primary, fallback), regions),
            progress: None,
            state: RunState::Planning,
            run_timestamp: chrono::Local::now()
                .format(SNAPSHOT_TIMESTAMP_FORMAT)
                .to_string(),
            painted: 0,
            skipped: 0,
            snapshots: Vec::new(),
        })
    }

    /// Report progress through the given reporter
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Current lifecycle stage
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Margins around the pasted source
    pub const fn expansion(&self) -> Expansion {
        self.expansion
    }

    /// Validated run sizes
    pub const fn geometry(&self) -> RunGeometry {
        self.geometry
    }

    /// Tiles in paint order
    pub const fn plan(&self) -> &TilePlan {
        &self.plan
    }

    /// Prompt selection state, including any derived fallback
    pub const fn selector(&self) -> &PromptSelector {
        &self.selector
    }

    /// Canvas as painted so far
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Area of the canvas covered by the pasted source
    pub const fn source_rect(&self) -> RegionBox {
        self.expansion.source_rect(self.geometry.source)
    }

    /// Whether a tile lies entirely within the pasted source
    pub const fn is_skipped(&self, tile: &Tile) -> bool {
        self.source_rect().contains(&tile.bounds())
    }

    /// Process one tile against the current canvas
    ///
    /// Snapshot failures are reported as [`TileOutcome::Failed`] as well,
    /// since the tile's diagnostics could not be produced.
    pub fn paint_tile(&mut self, tile: &Tile) -> TileOutcome {
        if self.is_skipped(tile) {
            self.skipped += 1;
            return TileOutcome::Skipped;
        }

        let bounds = tile.bounds();
        let square = self.canvas.crop(tile);
        let prompt = self.selector.select(&bounds);
        info!(
            "Inpainting region {} {} {} {} with: {prompt}",
            bounds.x0, bounds.y0, bounds.x1, bounds.y1
        );

        let request = InpaintRequest {
            image: &square,
            mask: &square,
            prompt,
            size: tile.size,
        };
        let painted = match self.services.inpainter.inpaint(&request) {
            Ok(painted) => painted,
            Err(error) => return TileOutcome::Failed(error),
        };
        if painted.dimensions() != (tile.side(), tile.side()) {
            return TileOutcome::Failed(service_error(
                "inpainting",
                &format!(
                    "expected a {side}x{side} square, received {}x{}",
                    painted.width(),
                    painted.height(),
                    side = tile.side()
                ),
            ));
        }

        self.canvas.paste(&painted, tile.x, tile.y);
        self.painted += 1;

        let snapshot = if self.config.verbose {
            self.snapshot()
        } else {
            Ok(())
        };
        match snapshot {
            Ok(()) => TileOutcome::Painted,
            Err(error) => TileOutcome::Failed(error),
        }
    }

    /// Paint every planned tile, then write the final canvas
    ///
    /// # Errors
    ///
    /// Returns [`OutpaintError::TileFailed`] for the first tile that fails,
    /// in which case no final output is written, or an export error if the
    /// final canvas cannot be saved. A run can only be executed once.
    pub fn run(&mut self) -> Result<RunReport> {
        if self.state != RunState::Planning {
            return Err(invalid_configuration(
                "state",
                &format!("{:?}", self.state),
                &"a prepared run can only be executed once",
            ));
        }

        let tiles: Vec<Tile> = self.plan.tiles().copied().collect();

        for (index, tile) in tiles.iter().enumerate() {
            self.state = RunState::Painting(index);
            match self.paint_tile(tile) {
                TileOutcome::Skipped => {
                    debug!("Skipping tile {index} at ({}, {}) inside the source", tile.x, tile.y);
                    if let Some(progress) = self.progress.as_mut() {
                        progress.skipped();
                    }
                }
                TileOutcome::Painted => {
                    if let Some(progress) = self.progress.as_mut() {
                        progress.painted();
                    }
                }
                TileOutcome::Failed(error) => {
                    self.state = RunState::Failed(index);
                    if let Some(progress) = &self.progress {
                        progress.abandon();
                    }
                    return Err(OutpaintError::TileFailed {
                        index,
                        x: tile.x,
                        y: tile.y,
                        source: Box::new(error),
                    });
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let output = self.config.output_path();
        save_png(self.canvas.pixels(), &output)?;
        self.state = RunState::Saved;
        info!("Output image saved to: {}", output.display());

        let report = RunReport {
            output,
            painted: self.painted,
            skipped: self.skipped,
            snapshots: std::mem::take(&mut self.snapshots),
        };
        self.state = RunState::Terminal;
        Ok(report)
    }

    fn snapshot(&mut self) -> Result<()> {
        let path = snapshot_path(
            &self.config.output_path(),
            &self.run_timestamp,
            self.painted,
        );
        info!("Saving snapshot: {}", path.display());
        save_png(self.canvas.pixels(), &path)?;
        self.snapshots.push(path);
        Ok(())
    }
}

/// Ask the text model for a human-free variant of `primary`
///
/// Malformed answers are logged and yield `None`; the run then uses the
/// primary prompt everywhere.
///
/// # Errors
///
/// Returns an error only if the text model cannot be reached
pub fn derive_fallback(rewriter: &dyn PromptRewriter, primary: &str) -> Result<Option<String>> {
    let instruction = fallback_instruction(primary);
    debug!("Adapting to non-human prompt:\n{instruction}");
    let raw = rewriter.complete(&instruction)?;
    debug!("Non-human prompt result: {raw}");

    match parse_fallback_response(&raw) {
        Ok(fallback) => {
            info!("Non-human prompt: {fallback}");
            Ok(Some(fallback))
        }
        Err(reason) => {
            warn!("Invalid non-human prompt ({reason}): {raw}");
            Ok(None)
        }
    }
}
