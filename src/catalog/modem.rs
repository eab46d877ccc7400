//! Vendor subtree of the modem, below [`DEVICE_ENTERPRISE`](crate::driver::DEVICE_ENTERPRISE).
//!
//! Levels are in 0.1 dB, frequencies in Hz, rates in bit/s unless noted. Byte and packet counters
//! are 32-bit and wrap.

section! {
    /// Commands and operating settings.
    pub struct Control {
        wo reboot = "1";
        /// Writes the running configuration to flash.
        wo save_config = "2";
        wo restore_defaults = "3";
        wo clear_statistics = "4";
        rw active_profile = "5";
        rw tx_enable = "6";
        rw tx_level = "7";
        wo alarm_reset = "8";
        rw rx_frequency = "9";
        rw tx_frequency = "10";
    }
}

section! {
    /// Receive statistics of one demodulator. The modem carries two with identical layout.
    pub struct DemodulatorStats {
        ro lock_state = "1";
        ro cn_ratio = "2";
        ro rx_level = "3";
        ro frequency_offset = "4";
        ro symbol_rate = "5";
        ro modcod = "6";
        ro rx_packets = "7";
        ro rx_bytes = "8";
        ro crc_errors = "9";
        ro lost_packets = "10";
        ro unlock_count = "11";
        ro buffer_overflows = "12";
        wo reset_counters = "13";
    }
}

section! {
    /// Transmit side.
    pub struct ModulatorStats {
        ro tx_packets = "1";
        ro tx_bytes = "2";
        ro tx_drops = "3";
        ro modcod = "4";
        ro symbol_rate = "5";
        ro output_level = "6";
    }
    children {
        queues: PriorityQueues = "10";
    }
}

section! {
    /// Per-priority transmit queues; the instance index is the priority.
    pub struct PriorityQueues {
        ro enqueued_packets = "1";
        ro enqueued_bytes = "2";
        ro dropped_packets = "3";
        ro dropped_bytes = "4";
        ro length = "5";
        ro max_length = "6";
        rw weight = "7";
        rw limit = "8";
    }
}

section! {
    /// TDMA return channel state.
    pub struct Tdma {
        ro network_id = "1";
        ro station_id = "2";
        ro state = "3";
        ro requests = "4";
        ro grants = "5";
        ro slots_assigned = "6";
        ro slots_used = "7";
    }
    children {
        frame: TdmaFrame = "10";
    }
}

section! {
    pub struct TdmaFrame {
        /// Microseconds.
        ro length = "1";
        ro slot_count = "2";
        ro superframe_number = "3";
        ro guard_interval = "4";
        ro carrier_count = "5";
    }
}

section! {
    /// Network clock reference and ranging.
    pub struct Timing {
        ro ncr_locked = "1";
        ro ncr_offset = "2";
        /// Microseconds.
        ro propagation_delay = "3";
        ro timing_corrections = "4";
        rw reference_source = "5";
        ro sync_losses = "6";
    }
}

section! {
    /// Static routing table; the instance index is the route number.
    pub struct Routing {
        rw destination = "1";
        rw mask = "2";
        rw gateway = "3";
        rw vlan = "4";
        ro packets = "5";
        ro bytes = "6";
        ro state = "7";
        wo remove = "8";
    }
}

section! {
    /// Traffic shaper table; the instance index is the shaper number.
    pub struct Shaper {
        rw committed_rate = "1";
        rw max_rate = "2";
        ro forwarded_packets = "3";
        ro forwarded_bytes = "4";
        ro dropped_packets = "5";
        ro dropped_bytes = "6";
        ro queue_length = "7";
        ro current_rate = "8";
    }
}

section! {
    pub struct SystemHealth {
        /// Percent.
        ro cpu_load = "1";
        ro memory_free = "2";
        ro memory_total = "3";
        /// Degrees Celsius.
        ro temperature = "4";
        ro supply_voltage = "5";
        ro fan_speed = "6";
        ro uptime = "7";
        ro fault_flags = "8";
        ro reboot_count = "9";
        ro buffer_usage = "10";
    }
}

section! {
    /// Position and tracking of a mobile station. Coordinates in 1e-6 degrees.
    pub struct MobileStation {
        ro latitude = "1";
        ro longitude = "2";
        ro altitude = "3";
        ro heading = "4";
        ro speed = "5";
        ro gps_state = "6";
        ro satellite_count = "7";
        ro handover_count = "8";
        ro beam = "9";
        rw antenna_tracking = "10";
    }
}
