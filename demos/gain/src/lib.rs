//! Gain demo plugin.
//!
//! A gain/mix effect with a web editor. The page in `web/` is embedded at
//! compile time; with the `dev-server` feature the editor loads it from
//! the Vite dev server instead.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use webrelay::prelude::*;

// =============================================================================
// Parameters
// =============================================================================

static MODES: &[&str] = &["Clean", "Warm", "Hard"];

/// The plugin's parameters, typed for the audio path.
pub struct GainParameters {
    pub gain: FloatParameter,
    pub mix: FloatParameter,
    pub bypass: BoolParameter,
    pub mode: ChoiceParameter,
}

impl GainParameters {
    pub fn new() -> Self {
        Self {
            gain: FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0),
            mix: FloatParameter::percent("mix", "Mix", 100.0),
            bypass: BoolParameter::bypass("bypass"),
            mode: ChoiceParameter::new("mode", "Mode", MODES, 0),
        }
    }

    /// Gain as a linear factor.
    pub fn gain_linear(&self) -> f32 {
        10f64.powf(self.gain.get() / 20.0) as f32
    }
}

impl Default for GainParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore for GainParameters {
    fn count(&self) -> usize {
        4
    }

    fn get(&self, index: usize) -> Option<&dyn ParameterRef> {
        match index {
            0 => Some(&self.gain),
            1 => Some(&self.mix),
            2 => Some(&self.bypass),
            3 => Some(&self.mode),
            _ => None,
        }
    }
}

// =============================================================================
// Processing
// =============================================================================

/// Peak levels shared between the audio thread and the editor.
#[derive(Debug, Default)]
pub struct Levels {
    input: AtomicU32,
    output: AtomicU32,
}

impl Levels {
    fn store(&self, input: f32, output: f32) {
        self.input.store(input.to_bits(), Ordering::Relaxed);
        self.output.store(output.to_bits(), Ordering::Relaxed);
    }

    pub fn input(&self) -> f32 {
        f32::from_bits(self.input.load(Ordering::Relaxed))
    }

    pub fn output(&self) -> f32 {
        f32::from_bits(self.output.load(Ordering::Relaxed))
    }
}

impl TelemetrySource for Levels {
    fn collect(&self) -> TelemetryPayload {
        TelemetryPayload::new()
            .with_number("inputLevel", f64::from(self.input()))
            .with_number("outputLevel", f64::from(self.output()))
    }
}

fn shape(mode: usize, x: f32) -> f32 {
    match mode {
        1 => x.tanh(),
        2 => x.clamp(-1.0, 1.0),
        _ => x,
    }
}

/// Process one mono block and publish its peak levels.
pub fn process_block(parameters: &GainParameters, levels: &Levels, input: &[f32], output: &mut [f32]) {
    let bypassed = parameters.bypass.get();
    let gain = parameters.gain_linear();
    let mix = (parameters.mix.get() / 100.0) as f32;
    let mode = parameters.mode.index();

    let mut peak_in = 0.0f32;
    let mut peak_out = 0.0f32;
    for (i, o) in input.iter().zip(output.iter_mut()) {
        *o = if bypassed {
            *i
        } else {
            let wet = shape(mode, *i * gain);
            *i + (wet - *i) * mix
        };
        peak_in = peak_in.max(i.abs());
        peak_out = peak_out.max(o.abs());
    }
    levels.store(peak_in, peak_out);
}

// =============================================================================
// Editor
// =============================================================================

pub static CONFIG: EditorConfig = EditorConfig::new("Gain Demo")
    .with_size(600, 400)
    .with_background_color([0x16, 0x18, 0x1d, 0xff]);

static ASSETS: &[EmbeddedAsset] = &[
    EmbeddedAsset {
        path: "index.html",
        data: include_bytes!("../web/index.html"),
    },
    EmbeddedAsset {
        path: "main.js",
        data: include_bytes!("../web/main.js"),
    },
    EmbeddedAsset {
        path: "style.css",
        data: include_bytes!("../web/style.css"),
    },
];

/// Relays for every control on the page.
pub fn relays() -> Result<RelaySet, RelayError> {
    RelaySet::new()
        .slider("gain")?
        .slider("mix")?
        .toggle("bypass")?
        .combo_box("mode")
}

/// Handles `__RELAY__.invoke()` calls from the page.
struct GainHandler {
    parameters: Arc<GainParameters>,
}

impl WebViewHandler for GainHandler {
    fn on_invoke(
        &self,
        method: &str,
        _args: &[serde_json::Value],
    ) -> Result<serde_json::Value, String> {
        match method {
            "getInfo" => Ok(serde_json::json!({
                "name": CONFIG.name,
                "version": env!("CARGO_PKG_VERSION"),
            })),
            "resetToDefaults" => {
                for p in self.parameters.iter() {
                    p.set_normalized(p.info().default_normalized);
                }
                Ok(serde_json::Value::Null)
            }
            _ => Err(format!("unknown method: {method}")),
        }
    }

    fn on_event(&self, name: &str, data: &serde_json::Value) {
        log::debug!("page event {name}: {data}");
    }
}

/// Build and bind the editor inside `parent`.
pub fn build_editor(
    factory: &mut dyn SurfaceFactory,
    parent: RawParent,
    parameters: Arc<GainParameters>,
    sink: Arc<dyn HostEditSink>,
) -> Result<Editor, RelayError> {
    let mut editor = SurfaceOptions::from_editor_config(&CONFIG)
        .with_assets(EmbeddedAssets::new(ASSETS))
        .with_relays(relays()?)
        .build(factory, parent)?
        .bind(parameters.clone(), sink)?;
    editor.set_webview_handler(Arc::new(GainHandler { parameters }));
    Ok(editor)
}
