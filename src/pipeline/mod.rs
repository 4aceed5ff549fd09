use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_extract;
pub mod stage3_forecast;
pub mod stage4_growth;
pub mod stage5_summary;
pub mod stage6_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Every stage, input through output.
    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_extract::Stage2Extract::new()),
            Box::new(stage3_forecast::Stage3Forecast::new()),
            Box::new(stage4_growth::Stage4Growth::new()),
            Box::new(stage5_summary::Stage5Summary::new()),
            Box::new(stage6_output::Stage6Output::new()),
        ])
    }

    /// Input checks only.
    pub fn validation() -> Self {
        Self::new(vec![
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_extract::Stage2Extract::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(
            horizon = ctx.config.horizon,
            window_start = ctx.config.window.start,
            window_end = ctx.config.window.end,
            damped = ctx.config.damped,
            "pipeline configured"
        );
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
