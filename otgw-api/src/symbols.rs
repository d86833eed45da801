use core::fmt;

use serde::{Deserialize, Serialize};

/// Label printed in place of a code that has no table entry.
pub const UNRESOLVED_LABEL: &str = "undefined";

/// OpenTherm message type, the 3-bit field following the parity bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Master to slave
    ReadData,
    WriteData,
    InvalidData,
    Reserved,
    /// Slave to master
    ReadAck,
    WriteAck,
    DataInvalid,
    UnknownDataId,
}

impl MessageType {
    pub const ALL: [MessageType; 8] = [
        MessageType::ReadData,
        MessageType::WriteData,
        MessageType::InvalidData,
        MessageType::Reserved,
        MessageType::ReadAck,
        MessageType::WriteAck,
        MessageType::DataInvalid,
        MessageType::UnknownDataId,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageType::ReadData => "READ_DATA",
            MessageType::WriteData => "WRITE_DATA",
            MessageType::InvalidData => "INVALID_DATA",
            MessageType::Reserved => "RESERVED",
            MessageType::ReadAck => "READ_ACK",
            MessageType::WriteAck => "WRITE_ACK",
            MessageType::DataInvalid => "DATA_INVALID",
            MessageType::UnknownDataId => "UNKNOWN_DATA_ID",
        }
    }

    /// Whether the message travels from the master (thermostat) to the slave (boiler).
    pub fn is_master_to_slave(&self) -> bool {
        self.code() < 4
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Known OpenTherm data ids, sorted by id.
static DATA_IDS: &[(u8, &str)] = &[
    (0, "Status"),
    (1, "TSet"),
    (2, "MConfigMMemberIDcode"),
    (3, "SConfigSMemberIDcode"),
    (4, "Command"),
    (5, "ASFflags"),
    (6, "RBPflags"),
    (7, "CoolingControl"),
    (8, "TsetCH2"),
    (9, "TrOverride"),
    (10, "TSP"),
    (11, "TSPindexTSPvalue"),
    (12, "FHBsize"),
    (13, "FHBindexFHBvalue"),
    (14, "MaxRelModLevelSetting"),
    (15, "MaxCapacityMinModLevel"),
    (16, "TrSet"),
    (17, "RelModLevel"),
    (18, "CHPressure"),
    (19, "DHWFlowRate"),
    (20, "DayTime"),
    (21, "Date"),
    (22, "Year"),
    (23, "TrSetCH2"),
    (24, "Tr,"),
    (25, "Tboiler"),
    (26, "Tdhw"),
    (27, "Toutside"),
    (28, "Tret"),
    (29, "Tstorage"),
    (30, "Tcollector"),
    (31, "TflowCH2"),
    (32, "Tdhw2"),
    (33, "Texhaust"),
    (48, "TdhwSetUBTdhwSetLB"),
    (49, "MaxTSetUBMaxTSetLB"),
    (50, "HcratioUBHcratioLB"),
    (56, "TdhwSet"),
    (57, "MaxTSet"),
    (58, "Hcratio"),
    (100, "RemoteOverrideFunction"),
    (115, "OEMDiagnosticCode"),
    (116, "BurnerStarts"),
    (117, "CHPumpStarts"),
    (118, "DHWPumpValveStarts"),
    (119, "DHWBurnerStarts"),
    (120, "BurnerOperationHours"),
    (121, "CHPumpOperationHours"),
    (122, "DHWPumpValveOperationHours"),
    (123, "DHWBurnerOperationHours"),
    (124, "OpenThermVersionMaster"),
    (125, "OpenThermVersionSlave"),
    (126, "MasterVersion"),
    (127, "SlaveVersion"),
];

pub fn message_type_name(code: u8) -> Option<&'static str> {
    MessageType::from_code(code).map(|message_type| message_type.name())
}

pub fn data_id_name(code: u8) -> Option<&'static str> {
    DATA_IDS
        .binary_search_by_key(&code, |(id, _)| *id)
        .ok()
        .map(|index| DATA_IDS[index].1)
}

/// Iterates all populated data ids in ascending order.
pub fn known_data_ids() -> impl Iterator<Item = (u8, &'static str)> {
    DATA_IDS.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_table() {
        let names: Vec<_> = (0..8).map(|code| message_type_name(code).unwrap()).collect();

        assert_eq!(
            names,
            [
                "READ_DATA",
                "WRITE_DATA",
                "INVALID_DATA",
                "RESERVED",
                "READ_ACK",
                "WRITE_ACK",
                "DATA_INVALID",
                "UNKNOWN_DATA_ID"
            ]
        );
        assert_eq!(message_type_name(8), None);
        assert_eq!(message_type_name(255), None);
    }

    #[test]
    fn test_message_type_direction() {
        assert!(MessageType::ReadData.is_master_to_slave());
        assert!(MessageType::Reserved.is_master_to_slave());
        assert!(!MessageType::ReadAck.is_master_to_slave());
        assert!(!MessageType::UnknownDataId.is_master_to_slave());
    }

    #[test]
    fn test_data_id_lookup() {
        assert_eq!(data_id_name(0), Some("Status"));
        assert_eq!(data_id_name(1), Some("TSet"));
        assert_eq!(data_id_name(24), Some("Tr,"));
        assert_eq!(data_id_name(25), Some("Tboiler"));
        assert_eq!(data_id_name(33), Some("Texhaust"));
        assert_eq!(data_id_name(100), Some("RemoteOverrideFunction"));
        assert_eq!(data_id_name(127), Some("SlaveVersion"));
    }

    #[test]
    fn test_data_id_gaps_have_no_label() {
        for code in (34..=47).chain(51..=55).chain(59..=99).chain(101..=114) {
            assert_eq!(data_id_name(code), None, "data id {code}");
        }
        for code in 128..=255u8 {
            assert_eq!(data_id_name(code), None, "data id {code}");
        }
    }

    #[test]
    fn test_data_id_table_is_sorted() {
        let ids: Vec<u8> = known_data_ids().map(|(id, _)| id).collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.len(), 54);
    }
}
