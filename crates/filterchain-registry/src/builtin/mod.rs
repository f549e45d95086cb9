//! The `builtin` plugin family: descriptors and handles that need no
//! external loader (§4.1 "the built-in catalog"). Every other family is an
//! external collaborator out of scope for this engine.

mod biquad;
mod convolver;
mod copy;
mod delay;
mod mixer;

use filterchain_core::descriptor::Descriptor;
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::{PluginFamily, PluginHandle};
use serde_json::value::RawValue;

/// The built-in plugin family. Stateless — every label's descriptor is
/// computed directly, and instantiation never touches disk.
pub struct BuiltinFamily;

impl PluginFamily for BuiltinFamily {
    fn make_desc(&self, label: &str) -> Result<Descriptor> {
        match label {
            "mixer" => Ok(mixer::descriptor()),
            "copy" => Ok(copy::descriptor()),
            "delay" => Ok(delay::descriptor()),
            "convolver" => Ok(convolver::descriptor()),
            _ => {
                if let Some(kind) = biquad::Kind::from_label(label) {
                    Ok(biquad::descriptor(kind))
                } else {
                    Err(EngineError::NotFound(format!("builtin: no such label '{label}'")))
                }
            }
        }
    }

    fn instantiate(
        &self,
        descriptor: &Descriptor,
        sample_rate: f32,
        instance_index: usize,
        config: Option<&RawValue>,
    ) -> Result<Box<dyn PluginHandle>> {
        match descriptor.label.as_str() {
            "mixer" => Ok(Box::new(mixer::Mixer::new())),
            "copy" => Ok(Box::new(copy::Copy::new())),
            "delay" => Ok(Box::new(delay::Delay::new(sample_rate, config)?)),
            "convolver" => Ok(Box::new(convolver::Convolver::new(sample_rate, instance_index, config)?)),
            label => {
                let kind = biquad::Kind::from_label(label)
                    .ok_or_else(|| EngineError::NotFound(format!("builtin: no such label '{label}'")))?;
                Ok(Box::new(biquad::BiquadHandle::new(kind, sample_rate)))
            }
        }
    }
}

/// Every label the built-in family can make a descriptor for, in the order
/// a `describe`-style command should list them.
pub fn catalog() -> Vec<&'static str> {
    let mut labels = vec!["mixer", "copy", "delay", "convolver"];
    labels.extend(biquad::Kind::ALL.iter().map(biquad::Kind::label));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_label_resolves_a_descriptor() {
        let family = BuiltinFamily;
        for label in catalog() {
            family.make_desc(label).unwrap_or_else(|e| panic!("{label}: {e}"));
        }
    }
}
