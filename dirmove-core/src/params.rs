//! Parameter normalization.
//!
//! Callers hand over loosely typed options (from code, a TOML file, a JSON
//! payload, CLI flags). Normalization never fails: every missing or malformed
//! value is replaced by its documented default.
//!
//! | option        | default | accepted                                   |
//! |---------------|---------|--------------------------------------------|
//! | `length`      | 14      | number whose integer part is >= 1          |
//! | `mamode`      | `rma`   | any known [`MaMode`] name, case-insensitive |
//! | `talib`       | true    | boolean                                    |
//! | `drift`       | 1       | integer >= 1                               |
//! | `offset`      | 0       | any integer                                |
//! | `fillna`      | none    | finite number                              |
//! | `fill_method` | none    | `ffill`/`pad`, `bfill`/`backfill`          |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::ma::MaMode;
use crate::shift::{FillMethod, FillPolicy};

pub const DEFAULT_LENGTH: usize = 14;
pub const DEFAULT_DRIFT: usize = 1;
pub const DEFAULT_OFFSET: isize = 0;

/// Validated directional-movement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmParams {
    /// Smoothing window.
    pub length: usize,
    /// Smoothing strategy for the internal pipeline.
    pub mamode: MaMode,
    /// Lag used when differencing highs and lows.
    pub drift: usize,
    /// Post-hoc lag applied to the finished columns.
    pub offset: isize,
    /// Prefer an injected native backend when one is available.
    pub use_native: bool,
    /// Gap filling applied after the offset.
    pub fill: FillPolicy,
}

impl Default for DmParams {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            mamode: MaMode::default(),
            drift: DEFAULT_DRIFT,
            offset: DEFAULT_OFFSET,
            use_native: true,
            fill: FillPolicy::default(),
        }
    }
}

/// Caller-supplied options before normalization.
///
/// Field names follow the option keys accepted in config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDmParams {
    pub length: Option<Value>,
    pub mamode: Option<Value>,
    pub talib: Option<Value>,
    pub drift: Option<Value>,
    pub offset: Option<Value>,
    pub fillna: Option<Value>,
    pub fill_method: Option<Value>,
}

impl RawDmParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, v: impl Into<Value>) -> Self {
        self.length = Some(v.into());
        self
    }

    pub fn mamode(mut self, v: impl Into<Value>) -> Self {
        self.mamode = Some(v.into());
        self
    }

    pub fn talib(mut self, v: impl Into<Value>) -> Self {
        self.talib = Some(v.into());
        self
    }

    pub fn drift(mut self, v: impl Into<Value>) -> Self {
        self.drift = Some(v.into());
        self
    }

    pub fn offset(mut self, v: impl Into<Value>) -> Self {
        self.offset = Some(v.into());
        self
    }

    pub fn fillna(mut self, v: impl Into<Value>) -> Self {
        self.fillna = Some(v.into());
        self
    }

    pub fn fill_method(mut self, v: impl Into<Value>) -> Self {
        self.fill_method = Some(v.into());
        self
    }

    /// Overlay `other` on top of `self`: any option set in `other` wins.
    pub fn merged_with(mut self, other: RawDmParams) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(length, mamode, talib, drift, offset, fillna, fill_method);
        self
    }

    /// Resolve every option to a safe value. Never fails.
    pub fn normalize(&self) -> DmParams {
        DmParams {
            length: normalize_length(self.length.as_ref()),
            mamode: normalize_mamode(self.mamode.as_ref()),
            drift: normalize_drift(self.drift.as_ref()),
            offset: normalize_offset(self.offset.as_ref()),
            use_native: normalize_talib(self.talib.as_ref()),
            fill: FillPolicy {
                value: normalize_fillna(self.fillna.as_ref()),
                method: normalize_fill_method(self.fill_method.as_ref()),
            },
        }
    }
}

impl From<&RawDmParams> for DmParams {
    fn from(raw: &RawDmParams) -> Self {
        raw.normalize()
    }
}

fn fallback<T: std::fmt::Debug>(option: &str, given: Option<&Value>, default: T) -> T {
    // Absent and explicit null are the normal "use the default" case.
    if let Some(v) = given.filter(|v| !v.is_null()) {
        debug!(option, given = %v, default = ?default, "malformed option, using default");
    }
    default
}

/// Integer part of a JSON number, if it has one that fits.
fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
}

fn normalize_length(v: Option<&Value>) -> usize {
    match v.and_then(as_integer) {
        Some(n) if n > 0 => n as usize,
        _ => fallback("length", v, DEFAULT_LENGTH),
    }
}

fn normalize_mamode(v: Option<&Value>) -> MaMode {
    match v.and_then(Value::as_str).map(str::parse::<MaMode>) {
        Some(Ok(mode)) => mode,
        _ => fallback("mamode", v, MaMode::default()),
    }
}

fn normalize_drift(v: Option<&Value>) -> usize {
    match v.and_then(Value::as_i64) {
        Some(n) if n >= 1 => n as usize,
        _ => fallback("drift", v, DEFAULT_DRIFT),
    }
}

fn normalize_offset(v: Option<&Value>) -> isize {
    match v.and_then(Value::as_i64) {
        Some(n) => n as isize,
        None => fallback("offset", v, DEFAULT_OFFSET),
    }
}

fn normalize_talib(v: Option<&Value>) -> bool {
    match v.and_then(Value::as_bool) {
        Some(b) => b,
        None => fallback("talib", v, true),
    }
}

fn normalize_fillna(v: Option<&Value>) -> Option<f64> {
    match v.and_then(Value::as_f64) {
        Some(x) if x.is_finite() => Some(x),
        _ => fallback("fillna", v, None),
    }
}

fn normalize_fill_method(v: Option<&Value>) -> Option<FillMethod> {
    match v.and_then(Value::as_str).map(str::parse::<FillMethod>) {
        Some(Ok(m)) => Some(m),
        _ => fallback("fill_method", v, None),
    }
}
