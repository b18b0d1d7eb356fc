use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

/// Picks the inference device for the cross-encoder.
///
/// GPU backends are tried in order (Metal, then CUDA) when compiled in; anything that
/// fails falls through to CPU.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Using Metal device for reranking");
            return device;
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Using CUDA device for reranking");
            return device;
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!(failures = %failures.join("; "), "GPU unavailable, reranking on CPU");
    }
    Device::Cpu
}

/// Short label for logs and health output.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
