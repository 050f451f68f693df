//! Embedded node-type and property tables.
//!
//! This is the authoritative copy of the schema: the snapshot wire format in
//! `schema::Schema` is generated from (and must agree with) these tables.
//! Property tables cover the node types seen in real projects; everything
//! else falls back to the common-property table.

use std::collections::BTreeMap;

use super::{NodeCategory, PropType, PropertyDefinition};
use crate::model::PropValue;

pub const SCHEMA_VERSION: &str = "2.1";

// =============================================================================
// NODE TYPES BY CATEGORY
// =============================================================================

pub const PRIMITIVE: &[&str] = &[
    "Brush", "Cellular", "Cellular3D", "Checker", "Constant", "DotNoise", "DriftNoise", "File",
    "Gabor", "Hemisphere", "LinearGradient", "LineNoise", "MultiFractal", "Noise", "Object",
    "Pattern", "Perlin", "RadialGradient", "Resource", "Shape", "SlopeNoise", "TileInput",
    "Voronoi", "Voronoi3D", "WaveShine", "Worley",
];

pub const TERRAIN: &[&str] = &[
    "Badlands", "Basin", "Butte", "Canyon", "Cliffs", "Crater", "CraterField", "Desert",
    "DuneSea", "Dunes", "Fault", "Highlands", "Hills", "Island", "Lowlands", "Mesa", "Mountain",
    "MountainRange", "MountainSide", "Peaks", "Plains", "Plates", "Range", "Ridge", "Rugged",
    "Slump", "Uplift", "Volcano",
];

pub const MODIFY: &[&str] = &[
    "Adjust", "Aperture", "Autolevel", "Blur", "Clamp", "Clip", "Curve", "Deviate", "Dilate",
    "Displace", "Distance", "Distort", "Edge", "Equalize", "Extend", "Filter", "Flip", "Fold",
    "GraphicEQ", "Heal", "Match", "Median", "Origami", "Pixelate", "Recurve", "Shaper",
    "Sharpen", "Shift", "Swirl", "Terrace", "ThermalShaper", "Threshold", "Transform",
    "Transpose", "Warp", "Whorl",
];

pub const SURFACE: &[&str] = &[
    "Bomber", "Bulbous", "Contours", "Craggy", "Distress", "FractalTerraces", "Grit", "Outcrops",
    "Pockmarks", "RockNoise", "Rockscape", "Roughen", "Sand", "Sandstone", "Shatter", "Shear",
    "Steps", "Stones", "Stratify", "Terraces", "Veins",
];

pub const SIMULATE: &[&str] = &[
    "Anastomosis", "Crumble", "Debris", "Deposits", "Dusting", "EasyErosion", "Erosion",
    "Erosion2", "Glacier", "HydroFix", "IceFloe", "Lake", "Rivers", "Scree", "Sediments",
    "Shrubs", "Snow", "Snowfield", "Thermal", "Thermal2", "Trees", "Wizard", "Wizard2",
];

pub const DERIVE: &[&str] = &[
    "Angle", "Curvature", "FlowMap", "FlowMapClassic", "Height", "Normals", "Occlusion",
    "RockMap", "Roughness", "Slope", "Soil", "TextureBase", "Texturizer", "Wear",
];

pub const COLORIZE: &[&str] = &[
    "CLUTer", "ColorErosion", "ColorFX", "Gamma", "HSL", "Palette", "RGBMerge", "RGBSplit",
    "SatMap", "Splat", "SuperColor", "Synth", "Tint", "WaterColor", "Weathering",
];

pub const OUTPUT: &[&str] = &[
    "Cartography", "Export", "Mesher", "PointCloud", "Unity", "Unreal", "Vista",
];

pub const UTILITY: &[&str] = &[
    "Chokepoint", "Combine", "Compare", "Data", "Gate", "Layers", "Mask", "Mixer", "Portal",
    "Repeat", "Reseed", "Route", "Seamless", "Switch",
];

pub fn category_tables() -> [(NodeCategory, &'static [&'static str]); 9] {
    [
        (NodeCategory::Primitive, PRIMITIVE),
        (NodeCategory::Terrain, TERRAIN),
        (NodeCategory::Modify, MODIFY),
        (NodeCategory::Surface, SURFACE),
        (NodeCategory::Simulate, SIMULATE),
        (NodeCategory::Derive, DERIVE),
        (NodeCategory::Colorize, COLORIZE),
        (NodeCategory::Output, OUTPUT),
        (NodeCategory::Utility, UTILITY),
    ]
}

/// Simulate-class nodes that dominate build time.
pub const HEAVY_TYPES: &[&str] = &[
    "EasyErosion", "Erosion", "Erosion2", "Rivers", "Snow", "Thermal", "Thermal2", "Wizard",
    "Wizard2",
];

/// The erosion family proper, for chain tracing.
pub const EROSION_TYPES: &[&str] =
    &["EasyErosion", "Erosion", "Erosion2", "Wizard", "Wizard2"];

// =============================================================================
// PROPERTY DEFINITION BUILDERS
// =============================================================================

fn int(min: i64, max: i64, default: i64) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::Int,
        default: Some(PropValue::Int(default)),
        range: Some([min as f64, max as f64]),
        values: None,
    }
}

fn float(min: f64, max: f64, default: f64) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::Float,
        default: Some(PropValue::Float(default)),
        range: Some([min, max]),
        values: None,
    }
}

fn boolean(default: bool) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::Bool,
        default: Some(PropValue::Bool(default)),
        range: None,
        values: None,
    }
}

fn choice(values: &[&str], default: &str) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::Enum,
        default: Some(PropValue::Str(default.to_string())),
        range: None,
        values: Some(values.iter().map(|v| v.to_string()).collect()),
    }
}

fn float2(x: f64, y: f64) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::Float2,
        default: Some(PropValue::Vec2 { x, y }),
        range: None,
        values: None,
    }
}

fn text(default: &str) -> PropertyDefinition {
    PropertyDefinition {
        kind: PropType::String,
        default: Some(PropValue::Str(default.to_string())),
        range: None,
        values: None,
    }
}

fn table(entries: &[(&str, PropertyDefinition)]) -> BTreeMap<String, PropertyDefinition> {
    entries
        .iter()
        .map(|(name, def)| (name.to_string(), def.clone()))
        .collect()
}

// =============================================================================
// COMMON FALLBACK TABLE
// =============================================================================

pub fn common_property_table() -> BTreeMap<String, PropertyDefinition> {
    table(&[
        ("Seed", int(0, 999_999, 0)),
        ("Scale", float(0.01, 10.0, 1.0)),
        ("Height", float(0.0, 1.0, 0.5)),
    ])
}

// =============================================================================
// PER-TYPE PROPERTY TABLES
// =============================================================================

pub fn node_property_tables() -> BTreeMap<String, BTreeMap<String, PropertyDefinition>> {
    let mut t = BTreeMap::new();

    // --- terrain generators -------------------------------------------------
    t.insert(
        "Mountain".to_string(),
        table(&[
            ("Scale", float(0.1, 5.0, 1.0)),
            ("Height", float(0.0, 1.0, 0.7)),
            ("Style", choice(&["Basic", "Eroded", "Old", "Alpine", "Strata"], "Alpine")),
            ("Bulk", choice(&["Low", "Medium", "High"], "Medium")),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Ridge".to_string(),
        table(&[
            ("Scale", float(0.1, 5.0, 1.0)),
            ("Height", float(0.0, 1.0, 0.6)),
            ("Sharpness", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Canyon".to_string(),
        table(&[
            ("Scale", float(0.1, 5.0, 1.0)),
            ("Depth", float(0.0, 1.0, 0.6)),
            ("Style", choice(&["Standard", "Slot", "Branching"], "Standard")),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Island".to_string(),
        table(&[
            ("Size", float(0.0, 1.0, 0.5)),
            ("Height", float(0.0, 1.0, 0.5)),
            ("Beaches", float(0.0, 1.0, 0.3)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Volcano".to_string(),
        table(&[
            ("Scale", float(0.1, 5.0, 1.0)),
            ("Height", float(0.0, 1.0, 0.8)),
            ("Mouth", float(0.0, 1.0, 0.5)),
            ("Surface", choice(&["Smooth", "Eroded"], "Eroded")),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Dunes".to_string(),
        table(&[
            ("Scale", float(0.1, 5.0, 1.0)),
            ("Direction", float(0.0, 360.0, 0.0)),
            ("Chaos", float(0.0, 1.0, 0.3)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );

    // --- primitives ---------------------------------------------------------
    t.insert(
        "Perlin".to_string(),
        table(&[
            ("Type", choice(&["Default", "Ridged", "Billowy"], "Default")),
            ("Scale", float(0.01, 20.0, 1.0)),
            ("Octaves", int(1, 12, 8)),
            ("Gain", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Voronoi".to_string(),
        table(&[
            ("Scale", float(0.01, 20.0, 1.0)),
            ("Jitter", float(0.0, 1.0, 0.8)),
            ("Style", choice(&["Cells", "Edges", "Solid"], "Cells")),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Constant".to_string(),
        table(&[("Value", float(0.0, 1.0, 0.5))]),
    );
    t.insert(
        "LinearGradient".to_string(),
        table(&[("Direction", float(0.0, 360.0, 0.0))]),
    );

    // --- simulate -----------------------------------------------------------
    t.insert(
        "Erosion".to_string(),
        table(&[
            ("Duration", float(0.0, 20.0, 0.04)),
            ("RockSoftness", float(0.0, 1.0, 0.4)),
            ("Strength", float(0.0, 1.0, 0.5)),
            ("FeatureScale", int(50, 10_000, 2000)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Erosion2".to_string(),
        table(&[
            ("Duration", float(0.0, 20.0, 0.07)),
            ("Shape", float(0.0, 1.0, 0.42)),
            ("ShapeSharpness", float(0.0, 1.0, 0.6)),
            ("FeatureScale", int(50, 10_000, 2000)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Rivers".to_string(),
        table(&[
            ("Water", float(0.0, 1.0, 0.5)),
            ("Width", float(0.0, 1.0, 0.5)),
            ("Depth", float(0.0, 1.0, 0.5)),
            ("Downcutting", float(0.0, 1.0, 0.3)),
            ("Headwaters", int(1, 1000, 100)),
            ("RenderSurface", boolean(false)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Snow".to_string(),
        table(&[
            ("Duration", float(0.0, 1.0, 0.5)),
            ("SnowLine", float(0.0, 1.0, 0.7)),
            ("Melt", float(0.0, 1.0, 0.3)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Thermal".to_string(),
        table(&[
            ("Strength", float(0.0, 1.0, 0.5)),
            ("Angle", float(0.0, 90.0, 35.0)),
            ("Iterations", int(1, 100, 10)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Thermal2".to_string(),
        table(&[
            ("Strength", float(0.0, 1.0, 0.5)),
            ("Angle", float(0.0, 90.0, 35.0)),
            ("Iterations", int(1, 100, 10)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Wizard".to_string(),
        table(&[
            ("Amount", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Lake".to_string(),
        table(&[
            ("Level", float(0.0, 1.0, 0.3)),
            ("Shore", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );

    // --- modify -------------------------------------------------------------
    t.insert(
        "Adjust".to_string(),
        table(&[
            ("Brightness", float(-1.0, 1.0, 0.0)),
            ("Contrast", float(-1.0, 1.0, 0.0)),
            ("Equalize", boolean(false)),
        ]),
    );
    t.insert(
        "Blur".to_string(),
        table(&[("Radius", float(0.0, 10.0, 0.5))]),
    );
    t.insert(
        "Clamp".to_string(),
        table(&[
            ("Min", float(0.0, 1.0, 0.0)),
            ("Max", float(0.0, 1.0, 1.0)),
        ]),
    );
    t.insert(
        "Warp".to_string(),
        table(&[
            ("Size", float(0.0, 1.0, 0.25)),
            ("Strength", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Terrace".to_string(),
        table(&[
            ("Terraces", int(2, 100, 10)),
            ("Uniformity", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Transform".to_string(),
        table(&[
            ("Translate", float2(0.0, 0.0)),
            ("Rotate", float(-180.0, 180.0, 0.0)),
            ("Scale", float(0.1, 10.0, 1.0)),
        ]),
    );

    // --- surface ------------------------------------------------------------
    t.insert(
        "Stratify".to_string(),
        table(&[
            ("Spacing", float(0.0, 1.0, 0.3)),
            ("Tilt", float(-45.0, 45.0, 0.0)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "FractalTerraces".to_string(),
        table(&[
            ("Spacing", float(0.0, 1.0, 0.3)),
            ("Octaves", int(1, 10, 4)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Stones".to_string(),
        table(&[
            ("Size", float(0.0, 1.0, 0.3)),
            ("Density", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );
    t.insert(
        "Shear".to_string(),
        table(&[
            ("Strength", float(0.0, 1.0, 0.5)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );

    // --- derive -------------------------------------------------------------
    t.insert(
        "Height".to_string(),
        table(&[
            ("Min", float(0.0, 1.0, 0.0)),
            ("Max", float(0.0, 1.0, 1.0)),
            ("Falloff", float(0.0, 1.0, 0.1)),
        ]),
    );
    t.insert(
        "Slope".to_string(),
        table(&[
            ("MinAngle", float(0.0, 90.0, 0.0)),
            ("MaxAngle", float(0.0, 90.0, 90.0)),
            ("Falloff", float(0.0, 1.0, 0.1)),
        ]),
    );

    // --- colorize -----------------------------------------------------------
    t.insert(
        "SatMap".to_string(),
        table(&[
            ("Library", choice(&["Rock", "Sand", "Green", "Blue", "Color"], "Rock")),
            ("LibraryItem", int(0, 200, 0)),
            ("Enhance", choice(&["None", "Autolevel", "Equalize"], "None")),
            ("Reverse", boolean(false)),
        ]),
    );
    t.insert(
        "CLUTer".to_string(),
        table(&[
            ("Saturation", float(0.0, 2.0, 1.0)),
            ("Seed", int(0, 999_999, 0)),
        ]),
    );

    // --- output -------------------------------------------------------------
    t.insert(
        "Export".to_string(),
        table(&[
            ("Format", choice(&["PNG16", "PNG8", "TIFF", "EXR", "RAW"], "PNG16")),
            ("Filename", text("Untitled")),
        ]),
    );
    t.insert(
        "Mesher".to_string(),
        table(&[("Quality", float(0.0, 1.0, 0.5))]),
    );

    // --- utility ------------------------------------------------------------
    t.insert(
        "Combine".to_string(),
        table(&[
            ("Ratio", float(0.0, 1.0, 0.5)),
            (
                "Mode",
                choice(
                    &["Blend", "Add", "Subtract", "Multiply", "Max", "Min", "Screen", "Overlay"],
                    "Blend",
                ),
            ),
        ]),
    );

    t
}
