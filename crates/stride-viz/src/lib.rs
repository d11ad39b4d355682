use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use stride_core::{StepStage, schedule_digest};

#[derive(Default)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/// Gated console/JSONL output knobs. `print_every = 0` disables printing.
#[derive(Copy, Clone, Debug)]
pub struct DebugSettings {
    pub print_every: u32,
    pub json_every: u32,
    pub show_bodies: bool,
    pub show_contacts: bool,
    pub show_characters: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            print_every: 0,
            json_every: 0,
            show_bodies: false,
            show_contacts: false,
            show_characters: true,
            max_lines: 16,
        }
    }
}

/// Per-tick provenance events, dumped as JSONL when enabled.
#[derive(Copy, Clone, Debug, Serialize)]
#[serde(tag = "ev")]
pub enum LedgerEvent {
    GroundContact { body: u32, ny: f32, depth: f32 },
    ImpulseN { body: u32, jn: f32 },
    PosCorr { body: u32, corr: f32 },
    SlopeProbe { body: u32, angle: f32 },
    Grounded { body: u32, soft: bool, in_air: f32 },
    Jump { body: u32, impulse: f32 },
    AirDamp { body: u32, vy: f32 },
    SkipNoCollider { body: u32 },
}

/// Bounded event log; events past `cap` are dropped for the tick.
pub struct Ledger {
    events: Vec<LedgerEvent>,
    cap: usize,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self { events: Vec::with_capacity(cap.min(1024)), cap }
    }

    pub fn push(&mut self, ev: LedgerEvent) {
        if self.events.len() < self.cap { self.events.push(ev); }
    }

    pub fn clear(&mut self) { self.events.clear(); }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }

    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    /// Append this tick's events to `<dir>/ledger_<tick>.jsonl`.
    pub fn write_jsonl(&self, dir: &str, tick: u64) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("creating ledger dir {dir}"))?;
        let path = Path::new(dir).join(format!("ledger_{tick:08}.jsonl"));
        let mut f = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        for ev in &self.events {
            let line = serde_json::to_string(ev)?;
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
