//! Publish a source reading to the live store.

use slc::{LimitSource, ParamStore};

use super::common::{SourceArg, SpeedUnitArg, Stores};
use crate::error::CliError;

/// Publish one reading.
pub fn run(
    stores: &Stores,
    source: SourceArg,
    value: f64,
    unit: SpeedUnitArg,
) -> Result<(), CliError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::Usage(format!(
            "Speed limit must be a non-negative number, got {}",
            value
        )));
    }

    let source = LimitSource::from(source);
    let value_ms = unit.to_ms(value);

    stores.live.put_json_float(source.live_key(), value_ms)?;

    tracing::debug!(source = %source, value_ms = value_ms, "Published reading");
    println!("Published {} = {:.2} m/s", source.live_key(), value_ms);

    Ok(())
}
