use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::codec::{convolve_bytes, quantize_bytes};
use crate::convolve::Kernel;
use crate::quantize::QuantizeConfig;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Reduce an encoded image to at most `n_colors` colors.
///
/// When `palette` (an array of `RRGGBB` strings) is given, k-means is skipped
/// and pixels are mapped onto those colors instead. `seed` makes the k-means
/// palette reproducible.
///
/// Resolves to `{ image: Uint8Array /* PNG */, palette: string[] }`.
#[wasm_bindgen(js_name = reduceColors)]
pub fn reduce_colors(
    input: Vec<u8>,
    n_colors: usize,
    palette: Option<Array>,
    seed: Option<u32>,
) -> Result<Object, JsValue> {
    let palette_hex: Option<Vec<String>> = palette
        .map(|list| {
            list.iter()
                .map(|v| {
                    v.as_string()
                        .ok_or_else(|| JsValue::from_str("Palette values must be strings"))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let mut config = QuantizeConfig::new();
    if let Some(seed) = seed {
        config = config.seed(seed as u64);
    }

    let (png, hex) = quantize_bytes(&input, n_colors, palette_hex.as_deref(), &config).map_err(js_err)?;

    let palette_js = Array::new();
    for h in hex {
        palette_js.push(&JsValue::from_str(&h));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(png.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Ok(result)
}

/// Convolve an encoded image with a named 3×3 kernel
/// (`identity`, `blur`, `edges`, `sharpen`) and return PNG bytes.
#[wasm_bindgen]
pub fn convolve(input: Vec<u8>, kernel: &str) -> Result<Uint8Array, JsValue> {
    let kernel = Kernel::from_name(kernel).map_err(js_err)?;
    let png = convolve_bytes(&input, &kernel).map_err(js_err)?;
    Ok(Uint8Array::from(png.as_slice()))
}
