use serde::Serialize;

use crate::Variant;

/// Hardware summary shown on the specifications tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSheet {
    pub variant: Variant,
    pub processing: &'static str,
    pub memory: &'static str,
    pub storage: &'static str,
    pub connectivity: &'static str,
}

impl SpecSheet {
    pub fn for_variant(variant: Variant) -> Self {
        let (processing, memory, storage, connectivity) = match variant {
            Variant::Standard => (
                "Dual-core processor",
                "4GB RAM",
                "128GB SSD",
                "Wi-Fi 6, Bluetooth 5.0",
            ),
            Variant::Premium => (
                "Quad-core processor",
                "8GB RAM",
                "512GB SSD",
                "Wi-Fi 6E, Bluetooth 5.2, Ethernet",
            ),
            Variant::Enterprise => (
                "Octa-core processor",
                "16GB RAM",
                "1TB SSD",
                "Wi-Fi 7, Bluetooth 5.3, Ethernet, 5G",
            ),
        };

        Self {
            variant,
            processing,
            memory,
            storage,
            connectivity,
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, &'static str); 4] {
        [
            ("Processing Power", self.processing),
            ("Memory", self.memory),
            ("Storage", self.storage),
            ("Connectivity", self.connectivity),
        ]
    }
}
