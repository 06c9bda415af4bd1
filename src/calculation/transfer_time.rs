//! Data transfer time estimates.
//!
//! Sizes and speeds are normalised to bits and bits per second. Decimal
//! prefixes (KB, MB, Mbps) are powers of 1000, binary prefixes (KiB, MiB)
//! are powers of 1024.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, InputValues};

use super::units::round_to;

/// Default protocol overhead for custom links, in percent.
pub const DEFAULT_OVERHEAD_PERCENT: f64 = 10.0;

/// Highest accepted protocol overhead, in percent.
pub const MAX_OVERHEAD_PERCENT: f64 = 90.0;

const BITS_PER_BYTE: f64 = 8.0;

/// Unit of a data size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataUnit {
    #[serde(rename = "B")]
    /// Bytes.
    Byte,
    #[serde(rename = "KB")]
    /// 10^3 bytes.
    Kilobyte,
    #[serde(rename = "MB")]
    /// 10^6 bytes.
    Megabyte,
    #[serde(rename = "GB")]
    /// 10^9 bytes.
    Gigabyte,
    #[serde(rename = "TB")]
    /// 10^12 bytes.
    Terabyte,
    #[serde(rename = "PB")]
    /// 10^15 bytes.
    Petabyte,
    #[serde(rename = "KiB")]
    /// 2^10 bytes.
    Kibibyte,
    #[serde(rename = "MiB")]
    /// 2^20 bytes.
    Mebibyte,
    #[serde(rename = "GiB")]
    /// 2^30 bytes.
    Gibibyte,
    #[serde(rename = "TiB")]
    /// 2^40 bytes.
    Tebibyte,
    #[serde(rename = "bit")]
    /// Bits.
    Bit,
    #[serde(rename = "Kbit")]
    /// 10^3 bits.
    Kilobit,
    #[serde(rename = "Mbit")]
    /// 10^6 bits.
    Megabit,
    #[serde(rename = "Gbit")]
    /// 10^9 bits.
    Gigabit,
}

impl DataUnit {
    /// Parses a unit symbol. Symbols are case-sensitive (`Mbit` is not `MB`).
    pub fn parse(value: &str) -> EngineResult<Self> {
        Ok(match value {
            "B" => Self::Byte,
            "KB" => Self::Kilobyte,
            "MB" => Self::Megabyte,
            "GB" => Self::Gigabyte,
            "TB" => Self::Terabyte,
            "PB" => Self::Petabyte,
            "KiB" => Self::Kibibyte,
            "MiB" => Self::Mebibyte,
            "GiB" => Self::Gibibyte,
            "TiB" => Self::Tebibyte,
            "bit" => Self::Bit,
            "Kbit" => Self::Kilobit,
            "Mbit" => Self::Megabit,
            "Gbit" => Self::Gigabit,
            other => {
                return Err(EngineError::invalid_input(
                    "data_unit",
                    format!("unknown data unit '{}'", other),
                ));
            }
        })
    }

    /// Number of bits in one unit.
    pub fn bits(&self) -> f64 {
        match self {
            Self::Byte => BITS_PER_BYTE,
            Self::Kilobyte => 1e3 * BITS_PER_BYTE,
            Self::Megabyte => 1e6 * BITS_PER_BYTE,
            Self::Gigabyte => 1e9 * BITS_PER_BYTE,
            Self::Terabyte => 1e12 * BITS_PER_BYTE,
            Self::Petabyte => 1e15 * BITS_PER_BYTE,
            Self::Kibibyte => 1024.0 * BITS_PER_BYTE,
            Self::Mebibyte => 1024f64.powi(2) * BITS_PER_BYTE,
            Self::Gibibyte => 1024f64.powi(3) * BITS_PER_BYTE,
            Self::Tebibyte => 1024f64.powi(4) * BITS_PER_BYTE,
            Self::Bit => 1.0,
            Self::Kilobit => 1e3,
            Self::Megabit => 1e6,
            Self::Gigabit => 1e9,
        }
    }
}

/// Unit of a transfer speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "bps")]
    /// Bits per second.
    BitsPerSecond,
    #[serde(rename = "Kbps")]
    /// 10^3 bits per second.
    KilobitsPerSecond,
    #[serde(rename = "Mbps")]
    /// 10^6 bits per second.
    MegabitsPerSecond,
    #[serde(rename = "Gbps")]
    /// 10^9 bits per second.
    GigabitsPerSecond,
    #[serde(rename = "KB/s")]
    /// 10^3 bytes per second.
    KilobytesPerSecond,
    #[serde(rename = "MB/s")]
    /// 10^6 bytes per second.
    MegabytesPerSecond,
    #[serde(rename = "GB/s")]
    /// 10^9 bytes per second.
    GigabytesPerSecond,
}

impl SpeedUnit {
    /// Parses a speed unit symbol.
    pub fn parse(value: &str) -> EngineResult<Self> {
        Ok(match value {
            "bps" => Self::BitsPerSecond,
            "Kbps" => Self::KilobitsPerSecond,
            "Mbps" => Self::MegabitsPerSecond,
            "Gbps" => Self::GigabitsPerSecond,
            "KB/s" => Self::KilobytesPerSecond,
            "MB/s" => Self::MegabytesPerSecond,
            "GB/s" => Self::GigabytesPerSecond,
            other => {
                return Err(EngineError::invalid_input(
                    "speed_unit",
                    format!("unknown speed unit '{}'", other),
                ));
            }
        })
    }

    /// Bits per second in one unit.
    pub fn bps(&self) -> f64 {
        match self {
            Self::BitsPerSecond => 1.0,
            Self::KilobitsPerSecond => 1e3,
            Self::MegabitsPerSecond => 1e6,
            Self::GigabitsPerSecond => 1e9,
            Self::KilobytesPerSecond => 1e3 * BITS_PER_BYTE,
            Self::MegabytesPerSecond => 1e6 * BITS_PER_BYTE,
            Self::GigabytesPerSecond => 1e9 * BITS_PER_BYTE,
        }
    }
}

/// A named link with its rated speed and typical real-world efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interface {
    /// Stable identifier used in requests.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Signalling rate in bits per second.
    pub rated_bps: f64,
    /// Fraction of the rated speed achieved in practice.
    pub efficiency: f64,
    /// Whether this is a radio link.
    pub wireless: bool,
}

const fn wired(id: &'static str, name: &'static str, rated_bps: f64, efficiency: f64) -> Interface {
    Interface {
        id,
        name,
        rated_bps,
        efficiency,
        wireless: false,
    }
}

const fn radio(id: &'static str, name: &'static str, rated_bps: f64, efficiency: f64) -> Interface {
    Interface {
        id,
        name,
        rated_bps,
        efficiency,
        wireless: true,
    }
}

/// Interfaces offered in interface mode and in the comparison table.
pub const INTERFACES: [Interface; 24] = [
    wired("usb_1_1", "USB 1.1", 12e6, 0.80),
    wired("usb_2_0", "USB 2.0", 480e6, 0.70),
    wired("usb_3_2_gen1", "USB 3.2 Gen 1", 5e9, 0.80),
    wired("usb_3_2_gen2", "USB 3.2 Gen 2", 10e9, 0.80),
    wired("usb_3_2_gen2x2", "USB 3.2 Gen 2x2", 20e9, 0.80),
    wired("usb4", "USB4", 40e9, 0.80),
    wired("thunderbolt_3", "Thunderbolt 3", 40e9, 0.80),
    wired("thunderbolt_4", "Thunderbolt 4", 40e9, 0.80),
    wired("thunderbolt_5", "Thunderbolt 5", 80e9, 0.80),
    wired("sata_1", "SATA I", 1.5e9, 0.80),
    wired("sata_2", "SATA II", 3e9, 0.80),
    wired("sata_3", "SATA III", 6e9, 0.80),
    wired("nvme_pcie_3", "NVMe PCIe 3.0 x4", 32e9, 0.85),
    wired("nvme_pcie_4", "NVMe PCIe 4.0 x4", 64e9, 0.85),
    wired("nvme_pcie_5", "NVMe PCIe 5.0 x4", 128e9, 0.85),
    wired("fast_ethernet", "Fast Ethernet", 100e6, 0.94),
    wired("gigabit_ethernet", "Gigabit Ethernet", 1e9, 0.94),
    wired("ethernet_2_5g", "2.5G Ethernet", 2.5e9, 0.94),
    wired("ethernet_10g", "10G Ethernet", 10e9, 0.94),
    radio("wifi_4", "Wi-Fi 4 (802.11n)", 600e6, 0.50),
    radio("wifi_5", "Wi-Fi 5 (802.11ac)", 3.5e9, 0.50),
    radio("wifi_6", "Wi-Fi 6 (802.11ax)", 9.6e9, 0.50),
    radio("wifi_7", "Wi-Fi 7 (802.11be)", 46e9, 0.50),
    radio("bluetooth_5", "Bluetooth 5", 2e6, 0.70),
];

/// Looks up an interface by id.
pub fn find_interface(id: &str) -> Option<&'static Interface> {
    INTERFACES.iter().find(|interface| interface.id == id)
}

/// Seconds needed to move `bits` over a link.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::transfer_seconds;
///
/// // 50 GB over 200 Mbps at 90% efficiency
/// let seconds = transfer_seconds(50e9 * 8.0, 200e6, 0.9).unwrap();
/// assert!((seconds - 2222.22).abs() < 0.01);
/// ```
pub fn transfer_seconds(bits: f64, rated_bps: f64, efficiency: f64) -> EngineResult<f64> {
    if !bits.is_finite() {
        return Err(EngineError::invalid_input("data_size", "is too large"));
    }
    if bits <= 0.0 {
        return Err(EngineError::invalid_input("data_size", "must be greater than zero"));
    }
    if !rated_bps.is_finite() {
        return Err(EngineError::invalid_input("speed", "is too large"));
    }
    if rated_bps <= 0.0 {
        return Err(EngineError::invalid_input("speed", "must be greater than zero"));
    }
    if !(efficiency > 0.0 && efficiency <= 1.0) {
        return Err(EngineError::CalculationError {
            message: format!("efficiency {} is outside (0, 1]", efficiency),
        });
    }
    let seconds = bits / (rated_bps * efficiency);
    if !seconds.is_finite() {
        return Err(EngineError::invalid_input("data_size", "is too large for this speed"));
    }
    Ok(seconds)
}

/// How the link speed was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// A user-entered speed with a protocol overhead percentage.
    Custom {
        /// Rated speed in bits per second.
        rated_bps: f64,
        /// Overhead in percent (0-90).
        overhead_percent: f64,
    },
    /// One of [`INTERFACES`].
    Interface(&'static Interface),
}

impl Link {
    /// Rated speed in bits per second.
    pub fn rated_bps(&self) -> f64 {
        match self {
            Link::Custom { rated_bps, .. } => *rated_bps,
            Link::Interface(interface) => interface.rated_bps,
        }
    }

    /// Fraction of the rated speed achieved.
    pub fn efficiency(&self) -> f64 {
        match self {
            Link::Custom {
                overhead_percent, ..
            } => 1.0 - overhead_percent / 100.0,
            Link::Interface(interface) => interface.efficiency,
        }
    }
}

/// Inputs to the transfer time calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferInput {
    /// Payload size in `data_unit`s.
    pub data_size: f64,
    /// Unit of `data_size`.
    pub data_unit: DataUnit,
    /// The link.
    pub link: Link,
}

impl TransferInput {
    /// Reads the calculator inputs.
    pub fn from_values(values: &InputValues) -> EngineResult<Self> {
        let data_size = values.require_number("data_size")?;
        let data_unit = DataUnit::parse(values.choice("data_unit").unwrap_or("GB"))?;

        let link = match values.choice("mode").unwrap_or("custom") {
            "custom" => {
                let speed = values.require_number("speed")?;
                let unit = SpeedUnit::parse(values.choice("speed_unit").unwrap_or("Mbps"))?;
                let overhead_percent = values
                    .number("overhead_percent")
                    .unwrap_or(DEFAULT_OVERHEAD_PERCENT);
                if !(0.0..=MAX_OVERHEAD_PERCENT).contains(&overhead_percent) {
                    return Err(EngineError::invalid_input(
                        "overhead_percent",
                        format!("must be between 0 and {}", MAX_OVERHEAD_PERCENT),
                    ));
                }
                Link::Custom {
                    rated_bps: speed * unit.bps(),
                    overhead_percent,
                }
            }
            "interface" => {
                let id = values.require_choice("interface")?;
                let interface = find_interface(id).ok_or_else(|| {
                    EngineError::invalid_input("interface", format!("unknown interface '{}'", id))
                })?;
                Link::Interface(interface)
            }
            other => {
                return Err(EngineError::invalid_input(
                    "mode",
                    format!("unknown mode '{}'", other),
                ));
            }
        };

        Ok(Self {
            data_size,
            data_unit,
            link,
        })
    }

    /// Payload size in bits.
    pub fn bits(&self) -> f64 {
        self.data_size * self.data_unit.bits()
    }
}

/// A duration split into calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationBreakdown {
    /// Whole days.
    pub days: u64,
    /// Whole hours after days.
    pub hours: u64,
    /// Whole minutes after hours.
    pub minutes: u64,
    /// Remaining seconds, rounded to two decimals.
    pub seconds: f64,
}

impl DurationBreakdown {
    /// Splits a number of seconds.
    pub fn from_seconds(total: f64) -> Self {
        let whole = total.floor() as u64;
        let fraction = total - whole as f64;
        Self {
            days: whole / 86_400,
            hours: whole % 86_400 / 3_600,
            minutes: whole % 3_600 / 60,
            seconds: round_to((whole % 60) as f64 + fraction, 2),
        }
    }
}

/// Transfer time over one interface from the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterfaceEstimate {
    /// Interface id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Signalling rate in bits per second.
    pub rated_bps: f64,
    /// Transfer time at the interface's typical efficiency.
    pub seconds: f64,
}

/// Result of the transfer time calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    /// Payload in bits.
    pub bits: f64,
    /// Payload in bytes.
    pub bytes: f64,
    /// Rated link speed in bits per second.
    pub rated_bps: f64,
    /// Efficiency applied to the rated speed.
    pub efficiency: f64,
    /// Throughput after overhead, in bits per second.
    pub effective_bps: f64,
    /// Throughput after overhead, in megabytes per second.
    pub effective_mb_per_s: f64,
    /// Total transfer time in seconds.
    pub seconds: f64,
    /// `seconds` split into days, hours, minutes and seconds.
    pub duration: DurationBreakdown,
    /// The same payload over every known interface.
    pub comparison: Vec<InterfaceEstimate>,
}

/// Transfer result together with its audit trail.
#[derive(Debug, Clone)]
pub struct TransferReport {
    /// The computed values.
    pub result: TransferResult,
    /// The audit steps.
    pub audit_steps: Vec<AuditStep>,
    /// Notes to show alongside the result.
    pub warnings: Vec<AuditWarning>,
}

/// Runs the transfer time calculator.
///
/// # Example
///
/// ```
/// use calculator_engine::calculation::{calculate_transfer_time, DataUnit, Link, TransferInput};
///
/// let input = TransferInput {
///     data_size: 50.0,
///     data_unit: DataUnit::Gigabyte,
///     link: Link::Custom { rated_bps: 200e6, overhead_percent: 10.0 },
/// };
///
/// let result = calculate_transfer_time(&input, 1).unwrap().result;
/// assert_eq!(result.duration.minutes, 37);
/// ```
pub fn calculate_transfer_time(input: &TransferInput, step_number: u32) -> EngineResult<TransferReport> {
    let bits = input.bits();
    let rated_bps = input.link.rated_bps();
    let efficiency = input.link.efficiency();
    let seconds = transfer_seconds(bits, rated_bps, efficiency)?;
    let effective_bps = rated_bps * efficiency;

    let comparison = INTERFACES
        .iter()
        .map(|interface| {
            transfer_seconds(bits, interface.rated_bps, interface.efficiency).map(|seconds| {
                InterfaceEstimate {
                    id: interface.id,
                    name: interface.name,
                    rated_bps: interface.rated_bps,
                    seconds,
                }
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let result = TransferResult {
        bits,
        bytes: bits / BITS_PER_BYTE,
        rated_bps,
        efficiency,
        effective_bps,
        effective_mb_per_s: effective_bps / BITS_PER_BYTE / 1e6,
        seconds,
        duration: DurationBreakdown::from_seconds(seconds),
        comparison,
    };

    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "transfer_normalise".to_string(),
            rule_name: "Unit Normalisation".to_string(),
            reference: "SI prefixes x1000, IEC prefixes x1024, 8 bits per byte".to_string(),
            input: serde_json::json!({
                "data_size": input.data_size,
                "data_unit": input.data_unit,
            }),
            output: serde_json::json!({ "bits": bits }),
            reasoning: format!(
                "{} {:?} = {} bits",
                input.data_size, input.data_unit, bits
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "transfer_time".to_string(),
            rule_name: "Transfer Time".to_string(),
            reference: "time = bits / (rated bps x efficiency)".to_string(),
            input: serde_json::json!({
                "bits": bits,
                "rated_bps": rated_bps,
                "efficiency": efficiency,
            }),
            output: serde_json::json!({ "seconds": seconds }),
            reasoning: format!(
                "{} / ({} x {}) = {:.2} s",
                bits, rated_bps, efficiency, seconds
            ),
        },
    ];

    let mut warnings = Vec::new();
    if let Link::Interface(interface) = &input.link {
        if interface.wireless {
            warnings.push(AuditWarning::new(
                "WIRELESS_ESTIMATE",
                format!(
                    "{} throughput depends heavily on signal strength and interference",
                    interface.name
                ),
                "info",
            ));
        }
    }

    Ok(TransferReport {
        result,
        audit_steps,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputValue;
    use proptest::prelude::*;

    fn custom(size: f64, unit: DataUnit, bps: f64, overhead: f64) -> TransferInput {
        TransferInput {
            data_size: size,
            data_unit: unit,
            link: Link::Custom {
                rated_bps: bps,
                overhead_percent: overhead,
            },
        }
    }

    #[test]
    fn test_fifty_gigabytes_at_200_mbps() {
        let result = calculate_transfer_time(&custom(50.0, DataUnit::Gigabyte, 200e6, 10.0), 1)
            .unwrap()
            .result;

        assert!((result.seconds - 2222.22).abs() < 0.01);
        assert_eq!(result.duration.days, 0);
        assert_eq!(result.duration.hours, 0);
        assert_eq!(result.duration.minutes, 37);
        assert!((result.duration.seconds - 2.22).abs() < 0.01);
        assert!((result.effective_mb_per_s - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_binary_and_decimal_prefixes_differ() {
        assert_eq!(DataUnit::Gigabyte.bits(), 8e9);
        assert_eq!(DataUnit::Gibibyte.bits(), 8.0 * 1_073_741_824.0);
        assert_eq!(DataUnit::Megabit.bits(), 1e6);
        assert_eq!(SpeedUnit::MegabytesPerSecond.bps(), 8e6);
    }

    #[test]
    fn test_unit_parsing_is_case_sensitive() {
        assert_eq!(DataUnit::parse("MB").unwrap(), DataUnit::Megabyte);
        assert_eq!(DataUnit::parse("Mbit").unwrap(), DataUnit::Megabit);
        assert!(DataUnit::parse("mb").is_err());
        assert_eq!(SpeedUnit::parse("MB/s").unwrap(), SpeedUnit::MegabytesPerSecond);
        assert!(SpeedUnit::parse("mbps").is_err());
    }

    #[test]
    fn test_zero_overhead_uses_rated_speed() {
        let result = calculate_transfer_time(&custom(1.0, DataUnit::Megabyte, 8e6, 0.0), 1)
            .unwrap()
            .result;
        assert_eq!(result.seconds, 1.0);
    }

    #[test]
    fn test_interface_table() {
        assert_eq!(INTERFACES.len(), 24);
        for interface in INTERFACES {
            assert!(interface.rated_bps > 0.0, "{}", interface.id);
            assert!(
                interface.efficiency > 0.0 && interface.efficiency <= 1.0,
                "{}",
                interface.id
            );
        }
        let usb2 = find_interface("usb_2_0").unwrap();
        assert_eq!(usb2.rated_bps, 480e6);
        assert!(find_interface("floppy").is_none());
    }

    #[test]
    fn test_interface_ids_are_unique() {
        for (i, a) in INTERFACES.iter().enumerate() {
            for b in &INTERFACES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_interface_mode_and_comparison() {
        let input = TransferInput {
            data_size: 1.0,
            data_unit: DataUnit::Gigabyte,
            link: Link::Interface(find_interface("gigabit_ethernet").unwrap()),
        };
        let report = calculate_transfer_time(&input, 1).unwrap();

        assert!((report.result.seconds - 8.0 / 0.94).abs() < 1e-9);
        assert_eq!(report.result.comparison.len(), 24);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_wireless_interface_warns() {
        let input = TransferInput {
            data_size: 1.0,
            data_unit: DataUnit::Gigabyte,
            link: Link::Interface(find_interface("wifi_6").unwrap()),
        };
        let report = calculate_transfer_time(&input, 1).unwrap();
        assert_eq!(report.warnings[0].code, "WIRELESS_ESTIMATE");
    }

    #[test]
    fn test_duration_breakdown() {
        let breakdown = DurationBreakdown::from_seconds(90_061.5);
        assert_eq!(breakdown.days, 1);
        assert_eq!(breakdown.hours, 1);
        assert_eq!(breakdown.minutes, 1);
        assert_eq!(breakdown.seconds, 1.5);
    }

    #[test]
    fn test_from_values_rejects_excess_overhead() {
        let values = InputValues::new()
            .with("data_size", InputValue::Number(1.0))
            .with("speed", InputValue::Number(100.0))
            .with("overhead_percent", InputValue::Number(95.0));

        match TransferInput::from_values(&values) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "overhead_percent"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_from_values_interface_mode() {
        let values = InputValues::new()
            .with("data_size", InputValue::Number(4.0))
            .with("data_unit", InputValue::Choice("GiB".to_string()))
            .with("mode", InputValue::Choice("interface".to_string()))
            .with("interface", InputValue::Choice("usb_3_2_gen1".to_string()));

        let input = TransferInput::from_values(&values).unwrap();
        assert_eq!(input.data_unit, DataUnit::Gibibyte);
        assert_eq!(input.link.rated_bps(), 5e9);
        assert_eq!(input.link.efficiency(), 0.80);
    }

    #[test]
    fn test_zero_size_is_invalid() {
        match calculate_transfer_time(&custom(0.0, DataUnit::Byte, 1e6, 10.0), 1) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "data_size"),
            other => panic!("Expected InvalidInput, got {:?}", other.map(|r| r.result)),
        }
    }

    #[test]
    fn test_size_beyond_f64_is_too_large() {
        match calculate_transfer_time(&custom(1e300, DataUnit::Petabyte, 1e6, 10.0), 1) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "data_size");
                assert_eq!(message, "is too large");
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|r| r.result)),
        }
    }

    #[test]
    fn test_duration_beyond_f64_is_invalid() {
        // 8e305 bits at 1e-6 bps with 90% overhead
        match calculate_transfer_time(&custom(1e290, DataUnit::Petabyte, 1e-6, 90.0), 1) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "data_size");
                assert_eq!(message, "is too large for this speed");
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|r| r.result)),
        }
    }

    #[test]
    fn test_enormous_finite_duration_does_not_panic() {
        let result = calculate_transfer_time(&custom(1e290, DataUnit::Petabyte, 1.0, 0.0), 1)
            .unwrap()
            .result;
        assert!(result.seconds.is_finite());
        assert_eq!(result.duration.days, u64::MAX / 86_400);
    }

    proptest! {
        #[test]
        fn prop_time_scales_linearly_with_size(
            size in 0.001f64..1e6,
            bps in 1e3f64..1e11,
            overhead in 0.0f64..90.0,
        ) {
            let one = calculate_transfer_time(&custom(size, DataUnit::Megabyte, bps, overhead), 1)
                .unwrap().result.seconds;
            let two = calculate_transfer_time(&custom(size * 2.0, DataUnit::Megabyte, bps, overhead), 1)
                .unwrap().result.seconds;
            prop_assert!((two - 2.0 * one).abs() <= 1e-9 * two.max(1.0));
        }
    }
}
