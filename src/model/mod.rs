/*!
Reference eigensolvers: Bloch Hamiltonians of nearest-neighbour tight-binding
models built from explicit hopping lists.
*/
pub mod tight_binding;

/// On-site energy (eV) used for carbon pz orbitals.
pub const CARBON_ONSITE: f64 = 0.0;
/// Nearest-neighbour hopping (eV) of graphene.
pub const GRAPHENE_HOPPING: f64 = -2.7;
