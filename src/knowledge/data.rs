//! Hand-curated relationship, pattern, and constraint tables.
//!
//! Loaded once at construction, never mutated. Wrong or missing entries here
//! degrade suggestion quality but never block a workflow from validating.

use super::{
    ConstraintKind, NodePattern, NodeRelationship, PropertyConstraint, RelationKind, TypePattern,
};

/// Property names that are integer-typed wherever they appear; constraint
/// suggestions targeting these are rounded.
pub const INTEGER_PROPERTIES: &[&str] = &[
    "FeatureScale",
    "Headwaters",
    "Iterations",
    "LibraryItem",
    "Octaves",
    "Seed",
    "Terraces",
];

fn rel(
    from: TypePattern,
    kind: RelationKind,
    to: TypePattern,
    strength: f64,
    description: &str,
) -> NodeRelationship {
    NodeRelationship {
        from,
        to,
        kind,
        strength,
        description: description.to_string(),
    }
}

fn named(t: &str) -> TypePattern {
    TypePattern::Named(t.to_string())
}

pub fn relationships() -> Vec<NodeRelationship> {
    use RelationKind::*;
    vec![
        // what typically follows what
        rel(named("Mountain"), Precedes, named("Erosion2"), 0.9, "mountains are almost always eroded"),
        rel(named("Mountain"), Precedes, named("Erosion"), 0.6, "classic erosion on mountain shapes"),
        rel(named("Ridge"), Precedes, named("Erosion2"), 0.8, "ridgelines benefit from hydraulic erosion"),
        rel(named("Island"), Precedes, named("Erosion2"), 0.7, "coastal shapes erode before texturing"),
        rel(named("Canyon"), Precedes, named("Stratify"), 0.7, "canyon walls show strata"),
        rel(named("Volcano"), Precedes, named("Thermal2"), 0.8, "volcanic slopes settle thermally"),
        rel(named("Dunes"), Precedes, named("Sand"), 0.6, "dune fields get sand surfacing"),
        rel(named("Erosion2"), Precedes, named("Rivers"), 0.85, "rivers carve eroded terrain"),
        rel(named("Erosion2"), Precedes, named("Snow"), 0.6, "snow deposits on eroded peaks"),
        rel(named("Erosion2"), Precedes, named("SatMap"), 0.7, "erosion data drives colorization"),
        rel(named("Rivers"), Precedes, named("SatMap"), 0.6, "water masks feed color maps"),
        rel(named("Snow"), Precedes, named("SatMap"), 0.6, "snow masks feed color maps"),
        rel(named("Perlin"), Precedes, named("Combine"), 0.5, "noise layers get blended"),
        rel(TypePattern::Any, Precedes, named("Export"), 0.3, "any output can be exported"),
        // hard prerequisites
        rel(named("Rivers"), Requires, named("Erosion2"), 0.7, "river simulation needs eroded flow data"),
        rel(named("ColorErosion"), Requires, named("Erosion2"), 0.8, "color erosion reuses erosion sediment data"),
        rel(named("Snowfield"), Requires, named("Snow"), 0.6, "snowfield refines a snow pass"),
        // mutual exclusions
        rel(named("Erosion"), Conflicts, named("Erosion2"), 0.6, "use one erosion generation, not both"),
        rel(named("Terrace"), Conflicts, named("FractalTerraces"), 0.5, "double terracing fights itself"),
        rel(named("Autolevel"), Conflicts, named("Equalize"), 0.5, "both renormalize the height field"),
        // opportunities
        rel(named("TextureBase"), Enhances, named("SatMap"), 0.7, "a texture base enriches color mapping"),
        rel(named("FlowMap"), Enhances, named("Rivers"), 0.6, "flow data sharpens river placement"),
        rel(named("Deposits"), Enhances, named("Erosion2"), 0.6, "sediment deposits add realism"),
        rel(named("Shear"), Enhances, named("Stratify"), 0.5, "sheared strata look geological"),
        // ordering hints
        rel(named("SatMap"), Follows, named("Erosion2"), 0.7, "colorize after shaping"),
        rel(named("Export"), Follows, named("SatMap"), 0.6, "export last"),
        // composition
        rel(named("Perlin"), CombinesWith, named("Voronoi"), 0.6, "organic/cellular noise blend"),
        rel(named("Mountain"), CombinesWith, named("Ridge"), 0.5, "ridge detail on mountain bulk"),
        // interchangeable choices
        rel(named("Erosion"), AlternativeTo, named("Erosion2"), 0.9, "older/newer erosion"),
        rel(named("Thermal"), AlternativeTo, named("Thermal2"), 0.9, "older/newer thermal"),
        rel(named("Voronoi"), AlternativeTo, named("Worley"), 0.7, "cellular noise variants"),
        // data-flow roles
        rel(named("Slope"), ProvidesDataFor, named("Splat"), 0.7, "slope masks drive splat maps"),
        rel(named("FlowMap"), ProvidesDataFor, named("SatMap"), 0.6, "flow data tints color maps"),
        rel(named("Splat"), ConsumesDataFrom, named("Slope"), 0.7, "splat maps read slope masks"),
        rel(named("Mesher"), ConsumesDataFrom, TypePattern::Any, 0.4, "meshing consumes any height data"),
    ]
}

fn pattern(name: &str, nodes: &[&str], tags: &[&str], frequency: f64) -> NodePattern {
    let nodes: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
    let edges = nodes
        .windows(2)
        .map(|w| (w[0].clone(), w[1].clone()))
        .collect();
    NodePattern {
        name: name.to_string(),
        nodes,
        edges,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        frequency,
    }
}

pub fn seed_patterns() -> Vec<NodePattern> {
    vec![
        pattern(
            "basic_terrain",
            &["Mountain", "Erosion2", "SatMap", "Export"],
            &["starter", "mountain"],
            10.0,
        ),
        pattern(
            "detailed_mountain",
            &["Mountain", "Erosion2", "Rivers", "Snow", "SatMap", "Export"],
            &["mountain", "alpine"],
            8.0,
        ),
        pattern(
            "volcanic",
            &["Volcano", "Thermal2", "Erosion2", "SatMap"],
            &["volcanic"],
            4.0,
        ),
        pattern(
            "canyon_strata",
            &["Canyon", "Stratify", "Erosion2", "SatMap"],
            &["canyon", "desert"],
            4.0,
        ),
        pattern(
            "desert_dunes",
            &["Dunes", "Sand", "Adjust", "SatMap"],
            &["desert"],
            3.0,
        ),
        pattern(
            "island_coast",
            &["Island", "Erosion2", "Rivers", "SatMap"],
            &["coastal"],
            3.0,
        ),
        pattern(
            "procedural_base",
            &["Perlin", "Voronoi", "Combine", "Erosion2", "SatMap"],
            &["procedural"],
            3.0,
        ),
    ]
}

fn constraint(
    source: (&str, &str),
    target: (&str, &str),
    kind: ConstraintKind,
    factor: f64,
    reason: &str,
) -> PropertyConstraint {
    PropertyConstraint {
        source_type: source.0.to_string(),
        source_property: source.1.to_string(),
        target_type: target.0.to_string(),
        target_property: target.1.to_string(),
        kind,
        factor,
        reason: reason.to_string(),
    }
}

pub fn property_constraints() -> Vec<PropertyConstraint> {
    use ConstraintKind::*;
    vec![
        constraint(
            ("Mountain", "Scale"),
            ("Erosion2", "Duration"),
            Proportional,
            0.05,
            "larger landmasses erode for longer",
        ),
        constraint(
            ("Erosion2", "Duration"),
            ("Rivers", "Headwaters"),
            InverselyProportional,
            20.0,
            "long erosion consolidates drainage into fewer sources",
        ),
        constraint(
            ("Mountain", "Height"),
            ("Snow", "SnowLine"),
            Proportional,
            0.9,
            "taller terrain carries the snow line higher",
        ),
        constraint(
            ("Canyon", "Depth"),
            ("Stratify", "Spacing"),
            Proportional,
            0.5,
            "deeper cuts expose wider strata",
        ),
        constraint(
            ("Mountain", "Scale"),
            ("Erosion2", "FeatureScale"),
            Proportional,
            2000.0,
            "erosion features track the landmass scale",
        ),
    ]
}
