//! Output devices.

//---------------------------------------------------------------------------------------------------- OutputDevice
/// An audio output device.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub struct OutputDevice {
	/// Stable identifier, pass this to
	/// [`Engine::set_device()`](crate::Engine::set_device).
	pub id: String,
	/// Human readable name.
	pub name: String,
	/// Is this the system's default output?
	pub is_default: bool,
}

/// Put the default device first and remove duplicate ids.
pub(crate) fn sort_devices(devices: &mut Vec<OutputDevice>) {
	// Stable, keeps the backend's order otherwise.
	devices.sort_by_key(|d| !d.is_default);

	let mut seen = std::collections::HashSet::with_capacity(devices.len());
	devices.retain(|d| seen.insert(d.id.clone()));
}
