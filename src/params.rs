use crate::collisions::Container;
use crate::{Scalar, Vec3};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A struct containing all of the high-level parameters for the SPH simulation.
///
/// Missing fields in a parameter file fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphParameters {
    /// The initial time step. The adaptive step controller rescales it at runtime.
    pub delta_time: Scalar,
    /// The radius of the smoothing kernel, also the neighbor grid cell size.
    pub h: Scalar,
    /// The stiffness `k` in the state equation `p = k (ρ - ρ0)`
    pub k: Scalar,
    /// The viscosity constant
    pub viscosity: Scalar,
    /// The surface tension coefficient (water-air)
    pub surface_tension: Scalar,
    /// Color gradient magnitude above which a particle counts as being on the surface
    pub surface_threshold: Scalar,
    /// The acceleration due to gravity
    pub gravity: Vec3,
    /// Target local error for adaptive time stepping
    pub error_tolerance: Scalar,
    /// Densities are clamped to at least this value.
    pub min_density: Scalar,
    /// Mass given to particles created by the initial conditions
    pub particle_mass: Scalar,
    pub container: Container,
}

impl Default for SphParameters {
    fn default() -> Self {
        Self {
            delta_time: 0.001,
            h: 0.05,
            k: 0.1,
            viscosity: 100.,
            surface_tension: 72.75,
            surface_threshold: 0.01,
            gravity: Vec3::new(0., -9.81, 0.),
            error_tolerance: 0.001,
            min_density: 1e-6,
            particle_mass: 0.02,
            container: Container::default(),
        }
    }
}

impl SphParameters {
    pub fn from_json(json: &[u8]) -> eyre::Result<Self> {
        serde_json::from_slice(json).wrap_err("Serde failed to deserialize JSON.")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read(path)
            .wrap_err_with(|| format!("Failed to read JSON settings file: {:?}", path))?;
        Self::from_json(&json).wrap_err_with(|| format!("Invalid settings in {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let params = SphParameters::from_json(br#"{ "h": 0.1, "viscosity": 5.0 }"#).unwrap();
        assert_eq!(params.h, 0.1);
        assert_eq!(params.viscosity, 5.);
        assert_eq!(params.k, SphParameters::default().k);
        assert_eq!(params.error_tolerance, 0.001);
    }

    #[test]
    fn container_can_be_configured() {
        let json = br#"{ "container": { "bounds": { "start": [-1, -1, -1], "end": [1, 1, 1] } } }"#;
        let params = SphParameters::from_json(json).unwrap();
        assert_eq!(
            params.container.bounds,
            Vec3::from_element(-1.)..Vec3::from_element(1.)
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SphParameters::from_json(b"{ h: }").is_err());
        assert!(SphParameters::from_json(br#"{ "h": "wide" }"#).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SphParameters::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(format!("{:?}", err).contains("Failed to read JSON settings file"));
    }
}
