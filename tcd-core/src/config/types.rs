//! Configuration type definitions
//!
//! Everything the fixture can be told at boot: where its channels live in
//! the universe, which optional features are enabled, and how the displays
//! are wired.

use tcd_protocol::layout::{clock_window_base, AUX_WINDOW_LEN, CLOCK_WINDOW_LEN};
use tcd_protocol::{Verification, DEFAULT_START_ADDRESS};

use crate::traits::DisplayRole;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of clock units on the bus
pub const CLOCK_UNITS: usize = 3;

/// Highest usable DMX channel
pub const MAX_CHANNEL: u16 = 512;

/// Default liveness timeout
pub const DEFAULT_TIMEOUT_MS: u32 = 1250;

/// Factory I2C address of the speedometer
pub const DEFAULT_SPEEDO_ADDRESS: u8 = 0x70;

/// HT16K33 address range (A0..A2 straps)
pub const I2C_ADDRESS_RANGE: core::ops::RangeInclusive<u8> = 0x70..=0x77;

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Start address outside 1..=512
    StartAddressOutOfRange(u16),
    /// The three clock windows do not fit in the universe
    WindowOverflow,
    /// Liveness timeout of zero
    ZeroTimeout,
    /// Verification slot outside 1..=512
    VerificationSlotOutOfRange(u16),
    /// Verification slot inside a display window
    VerificationSlotOverlaps(u16),
    /// Speedometer window outside the universe
    AuxWindowOutOfRange(u16),
    /// Speedometer window overlaps a clock window
    AuxWindowOverlaps(u16),
    /// I2C address not strappable on an HT16K33
    InvalidAddress(u8),
    /// Two units share an I2C address
    DuplicateAddress(u8),
}

/// Frame verification slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VerificationConfig {
    /// DMX channel holding the sentinel
    pub channel: u16,
    /// Expected value
    pub sentinel: u8,
}

/// Auxiliary speedometer unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedoConfig {
    /// DMX address of the speed channel; brightness follows it
    pub start_address: u16,
    /// I2C address
    pub address: u8,
}

impl Default for SpeedoConfig {
    fn default() -> Self {
        Self {
            start_address: DEFAULT_START_ADDRESS + (CLOCK_UNITS * CLOCK_WINDOW_LEN) as u16,
            address: DEFAULT_SPEEDO_ADDRESS,
        }
    }
}

/// Complete fixture configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixtureConfig {
    /// DMX address of the destination unit's first channel
    pub start_address: u16,
    /// Declare the source lost after this long without a frame
    pub timeout_ms: u32,
    pub verification: Option<VerificationConfig>,
    pub speedo: Option<SpeedoConfig>,
    /// I2C addresses in role order (destination, present, departed)
    pub addresses: [u8; CLOCK_UNITS],
    /// Show hours 0..=23 and no AM/PM
    pub mode_24h: bool,
    /// Night mode powers units off instead of dimming them
    pub night_mode_off: bool,
    /// AM and PM LEDs wired the other way round
    pub reverse_ampm: bool,
    /// Log per-unit refreshes
    pub debug: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            start_address: DEFAULT_START_ADDRESS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            verification: None,
            speedo: None,
            addresses: DisplayRole::ALL.map(DisplayRole::default_address),
            mode_24h: false,
            night_mode_off: false,
            reverse_ampm: false,
            debug: false,
        }
    }
}

impl FixtureConfig {
    /// Address of a clock unit
    pub fn address(&self, role: DisplayRole) -> u8 {
        self.addresses[role.index()]
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_address == 0 || self.start_address > MAX_CHANNEL {
            return Err(ConfigError::StartAddressOutOfRange(self.start_address));
        }

        let clock_start = usize::from(self.start_address);
        let clock_end = clock_window_base(self.start_address, CLOCK_UNITS);
        if clock_end - 1 > usize::from(MAX_CHANNEL) {
            return Err(ConfigError::WindowOverflow);
        }
        let clock_slots = clock_start..clock_end;

        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let aux_slots = match self.speedo {
            Some(speedo) => {
                let start = usize::from(speedo.start_address);
                let end = start + AUX_WINDOW_LEN;
                if speedo.start_address == 0 || end - 1 > usize::from(MAX_CHANNEL) {
                    return Err(ConfigError::AuxWindowOutOfRange(speedo.start_address));
                }
                if start < clock_slots.end && clock_slots.start < end {
                    return Err(ConfigError::AuxWindowOverlaps(speedo.start_address));
                }
                start..end
            }
            None => 0..0,
        };

        if let Some(verify) = self.verification {
            if verify.channel == 0 || verify.channel > MAX_CHANNEL {
                return Err(ConfigError::VerificationSlotOutOfRange(verify.channel));
            }
            let slot = usize::from(verify.channel);
            if clock_slots.contains(&slot) || aux_slots.contains(&slot) {
                return Err(ConfigError::VerificationSlotOverlaps(verify.channel));
            }
        }

        let speedo_address = self.speedo.map(|s| s.address);
        let all = self.addresses.iter().copied().chain(speedo_address);
        for (i, addr) in all.clone().enumerate() {
            if !I2C_ADDRESS_RANGE.contains(&addr) {
                return Err(ConfigError::InvalidAddress(addr));
            }
            if all.clone().skip(i + 1).any(|other| other == addr) {
                return Err(ConfigError::DuplicateAddress(addr));
            }
        }

        Ok(())
    }
}

/// Resolved feature set consulted by the decoder every cycle
///
/// Computed once at startup so the control loop never re-derives offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// Frame verification rule, if enabled
    pub verification: Option<Verification>,
    /// Slot index of each clock unit's window
    pub unit_bases: [usize; CLOCK_UNITS],
    /// Slot index of the speedometer window, if fitted
    pub aux_base: Option<usize>,
    pub timeout_ms: u32,
    pub mode_24h: bool,
    pub debug: bool,
}

impl Capabilities {
    /// Resolve a configuration
    ///
    /// `has_aux` is whether the speedometer was actually found on the bus;
    /// a configured but absent unit is treated as disabled.
    pub fn from_config(config: &FixtureConfig, has_aux: bool) -> Self {
        Self {
            verification: config
                .verification
                .map(|v| Verification::new(v.channel, v.sentinel)),
            unit_bases: core::array::from_fn(|unit| clock_window_base(config.start_address, unit)),
            aux_base: config
                .speedo
                .filter(|_| has_aux)
                .map(|s| usize::from(s.start_address)),
            timeout_ms: config.timeout_ms,
            mode_24h: config.mode_24h,
            debug: config.debug,
        }
    }

    pub fn has_verification(&self) -> bool {
        self.verification.is_some()
    }

    pub fn has_aux(&self) -> bool {
        self.aux_base.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FixtureConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.address(DisplayRole::Present), 0x72);
        assert_eq!(config.timeout_ms, 1250);
    }

    #[test]
    fn test_start_address_bounds() {
        let mut config = FixtureConfig::default();
        config.start_address = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartAddressOutOfRange(0))
        );

        // 33 channels from 480 end at 512
        config.start_address = 480;
        assert_eq!(config.validate(), Ok(()));
        config.start_address = 481;
        assert_eq!(config.validate(), Err(ConfigError::WindowOverflow));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = FixtureConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_verification_slot_must_not_overlap() {
        let mut config = FixtureConfig::default();
        config.verification = Some(VerificationConfig {
            channel: 20,
            sentinel: 0x55,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::VerificationSlotOverlaps(20))
        );

        config.verification = Some(VerificationConfig {
            channel: 100,
            sentinel: 0x55,
        });
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_speedo_window_checks() {
        let mut config = FixtureConfig::default();
        config.speedo = Some(SpeedoConfig::default());
        assert_eq!(config.validate(), Ok(()));

        config.speedo = Some(SpeedoConfig {
            start_address: 33,
            address: 0x70,
        });
        assert_eq!(config.validate(), Err(ConfigError::AuxWindowOverlaps(33)));

        config.speedo = Some(SpeedoConfig {
            start_address: 512,
            address: 0x70,
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::AuxWindowOutOfRange(512))
        );
    }

    #[test]
    fn test_address_checks() {
        let mut config = FixtureConfig::default();
        config.addresses = [0x71, 0x71, 0x74];
        assert_eq!(config.validate(), Err(ConfigError::DuplicateAddress(0x71)));

        config.addresses = [0x71, 0x72, 0x20];
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0x20)));

        config.addresses = [0x71, 0x72, 0x74];
        config.speedo = Some(SpeedoConfig {
            start_address: 100,
            address: 0x74,
        });
        assert_eq!(config.validate(), Err(ConfigError::DuplicateAddress(0x74)));
    }

    #[test]
    fn test_capabilities_resolve_offsets() {
        let config = FixtureConfig {
            start_address: 10,
            verification: Some(VerificationConfig {
                channel: 200,
                sentinel: 0xAA,
            }),
            speedo: Some(SpeedoConfig {
                start_address: 50,
                address: 0x70,
            }),
            ..Default::default()
        };

        let caps = Capabilities::from_config(&config, true);
        assert_eq!(caps.unit_bases, [10, 21, 32]);
        assert_eq!(caps.aux_base, Some(50));
        assert_eq!(caps.verification, Some(Verification::new(200, 0xAA)));

        let caps = Capabilities::from_config(&config, false);
        assert!(!caps.has_aux());
        assert!(caps.has_verification());
    }
}
