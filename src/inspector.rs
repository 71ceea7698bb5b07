//! The container inspection seam.

use crate::error::ProbeError;
use crate::metadata::Container;
use crate::registry::Registry;

/// Opens and probes media containers.
///
/// An inspector turns a path or URL into a fully populated [`Container`].
/// Implementations release every resource they acquired before returning,
/// on success and on failure alike.
///
/// The two probe failure kinds are reported as [`ProbeError::Open`] (the
/// input could not be opened or recognised) and [`ProbeError::StreamInfo`]
/// (the input was opened but its streams could not be resolved). Any other
/// error is treated as a setup problem rather than a property of the input.
pub trait ContainerInspector {
    /// Open `url`, resolve its stream information, and describe it.
    fn inspect(&self, url: &str) -> Result<Container, ProbeError>;

    /// Codec lookups matching the containers this inspector produces.
    fn registry(&self) -> &dyn Registry;
}

impl<I: ContainerInspector + ?Sized> ContainerInspector for &I {
    fn inspect(&self, url: &str) -> Result<Container, ProbeError> {
        (**self).inspect(url)
    }

    fn registry(&self) -> &dyn Registry {
        (**self).registry()
    }
}
