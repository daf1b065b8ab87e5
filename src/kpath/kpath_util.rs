use super::HighSymmetryPoint;

/// Γ -> K -> M -> Γ of the hexagonal (graphene) Brillouin zone.
pub fn graphene_path() -> Vec<HighSymmetryPoint> {
    vec![
        HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
        HighSymmetryPoint::new("K", [2.0 / 3.0, 1.0 / 3.0, 0.0]),
        HighSymmetryPoint::new("M", [0.5, 0.5, 0.0]),
        HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
    ]
}

/// Γ -> X -> M -> Γ of the square Brillouin zone.
pub fn square_path() -> Vec<HighSymmetryPoint> {
    vec![
        HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
        HighSymmetryPoint::new("X", [0.5, 0.0, 0.0]),
        HighSymmetryPoint::new("M", [0.5, 0.5, 0.0]),
        HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
    ]
}

/// Γ -> X along the chain axis.
pub fn chain_path() -> Vec<HighSymmetryPoint> {
    vec![
        HighSymmetryPoint::new("G", [0.0, 0.0, 0.0]),
        HighSymmetryPoint::new("X", [0.5, 0.0, 0.0]),
    ]
}

#[cfg(test)]
#[test]
fn test_standard_paths_are_closed() {
    let g = graphene_path();
    assert_eq!(g.first(), g.last());
    let s = square_path();
    assert_eq!(s.first(), s.last());
    assert_eq!(chain_path().len(), 2);
}
