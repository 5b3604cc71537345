//! Setting value validation.

use epd_display::Orientation;
use epd_display::driver::module_for_model;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "WAVESHARE_DISPLAY_MODEL" | "EPAPER_MODEL" => {
            if module_for_model(value).is_none() {
                return Err(format!("unsupported model '{value}'"));
            }
        }
        "EPAPER_ORIENTATION" => {
            value.parse::<Orientation>()?;
        }
        "EPAPER_OUTPUT_DIR" | "WAVESHARE_LIB_PATH" | "EPAPER_VENDOR_DIR" => {
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        _ => {}
    }

    if is_boolean_setting(key) && value != "true" && value != "false" {
        return Err("must be 'true' or 'false'".into());
    }

    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "EPAPER_ROTATE_BEFORE_FIT")
}
