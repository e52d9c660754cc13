use crate::schema::model::{PaletteBlock, PaletteMode};

/// Closing palette sentence shared by the wizard prompt.
pub fn render_palette_footer(palette: &PaletteBlock) -> String {
    let hint = match palette.mode {
        PaletteMode::Descriptive => format!("Use keywords: {}", palette.descriptive),
        mode => format!(
            "Use {} plate(s) with {mode}",
            palette.riso_plates.len()
        ),
    };
    format!(
        "{hint}. Enforce limited palette, flat ink fields, visible overprint overlaps, slight misregistration, no gradients."
    )
}

/// One-line palette directive for managed prompts, empty when there is nothing to say.
pub(crate) fn managed_palette_line(palette: &PaletteBlock) -> String {
    match palette.mode {
        PaletteMode::RisoPlates => {
            let plates = palette
                .riso_plates
                .iter()
                .map(|p| {
                    format!(
                        "{}:{}@{}% (misreg {})",
                        p.role, p.hex, p.opacity, p.misregistration
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("Palette (RISO plates): {plates}.")
        }
        PaletteMode::ImageExtract if !palette.image_extract.extracted.is_empty() => {
            let cols = palette
                .image_extract
                .extracted
                .iter()
                .map(|s| s.hex.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Palette (extracted): {cols}.")
        }
        _ if palette.descriptive.is_empty() => String::new(),
        _ => format!("Palette: {}.", palette.descriptive),
    }
}
