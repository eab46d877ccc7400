//! Standard MIB-II groups every modem exposes.

section! {
    /// `system` group, `1.3.6.1.2.1.1`.
    pub struct System {
        ro descr = "1";
        ro object_id = "2";
        /// Hundredths of a second since the agent started.
        ro up_time = "3";
        rw contact = "4";
        rw name = "5";
        rw location = "6";
        ro services = "7";
    }
}

section! {
    /// `interfaces` group, `1.3.6.1.2.1.2`.
    pub struct Interfaces {
        ro number = "1";
    }
    children {
        /// `ifTable` entries; the instance index is the `ifIndex`.
        table: InterfaceTable = "2.1";
    }
}

section! {
    /// `ifEntry` columns. Octet and packet counters are 32 bits wide and wrap.
    pub struct InterfaceTable {
        ro index = "1";
        ro descr = "2";
        ro kind = "3";
        ro mtu = "4";
        ro speed = "5";
        ro phys_address = "6";
        rw admin_status = "7";
        ro oper_status = "8";
        ro last_change = "9";
        ro in_octets = "10";
        ro in_ucast_pkts = "11";
        ro in_nucast_pkts = "12";
        ro in_discards = "13";
        ro in_errors = "14";
        ro in_unknown_protos = "15";
        ro out_octets = "16";
        ro out_ucast_pkts = "17";
        ro out_nucast_pkts = "18";
        ro out_discards = "19";
        ro out_errors = "20";
        ro out_queue_length = "21";
    }
}
