//! Device placement → Candle device.

use candle_core::Device;
use rxnrag_core::{DevicePlacement, EmbedError};
use tracing::info;

/// Resolve a placement to a concrete device.
///
/// `Default` is Candle's own default, the CPU. An explicit GPU placement that
/// is unavailable (not compiled in, or no such ordinal) is an error rather
/// than a silent CPU fallback.
pub fn resolve_device(placement: DevicePlacement) -> Result<Device, EmbedError> {
    let device = match placement {
        DevicePlacement::Default | DevicePlacement::Cpu => Device::Cpu,
        DevicePlacement::Cuda(ordinal) => Device::new_cuda(ordinal)
            .map_err(|e| EmbedError::Device(format!("cuda:{ordinal}: {e}")))?,
        DevicePlacement::Metal(ordinal) => Device::new_metal(ordinal)
            .map_err(|e| EmbedError::Device(format!("metal:{ordinal}: {e}")))?,
    };
    info!(placement = %placement, "Using {:?} for embedding inference", device);
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_and_cpu_resolve_to_cpu() {
        assert!(matches!(resolve_device(DevicePlacement::Default).unwrap(), Device::Cpu));
        assert!(matches!(resolve_device(DevicePlacement::Cpu).unwrap(), Device::Cpu));
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn cuda_without_support_is_error() {
        assert!(matches!(
            resolve_device(DevicePlacement::Cuda(0)),
            Err(EmbedError::Device(_))
        ));
    }
}
