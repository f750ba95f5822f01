// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces to the host platform and to the generic DWMAC core driver.
//!
//! The glue doesn't own any of these pieces; it looks resources up through
//! [Platform], configures the hardware, and then hands itself to a
//! [StmmacCore] as the [SetClkTxRate] hook.

use crate::config::PhyInterfaceMode;
use crate::soc::SocInfo;
use crate::{GmacError, Regmap};

/// Device-tree `compatible` strings handled by this glue
pub const OF_MATCH: &[&str] = &["qcom,ipq806x-gmac"];
pub const DRIVER_NAME: &str = "ipq806x-gmac-dwmac";

pub fn is_compatible(compatible: &str) -> bool {
    OF_MATCH.contains(&compatible)
}

/// Name of the MAC core clock in the device node
pub const CORE_CLK_NAME: &str = "stmmaceth";
/// The core clock always runs at this rate on IPQ806x
pub const CORE_CLK_RATE: u32 = 266_000_000;

pub const NSS_COMMON_PHANDLE: &str = "qcom,nss-common";
pub const QSGMII_CSR_PHANDLE: &str = "qcom,qsgmii-csr";

pub trait CoreClock {
    fn set_rate(&mut self, hz: u32) -> Result<(), GmacError>;
}

/// Resource lookup provided by the host platform.
pub trait Platform {
    type Regmap: Regmap;
    type Clock: CoreClock;

    /// Looks up a clock of the device node by name
    fn clock(&mut self, name: &str) -> Result<Self::Clock, GmacError>;

    /// Looks up the syscon register map referenced by the given phandle
    /// property of the device node
    fn syscon_regmap(
        &mut self,
        phandle: &str,
    ) -> Result<Self::Regmap, GmacError>;

    /// Identification of the SoC we're running on, if the platform knows
    fn soc_info(&self) -> SocInfo<'_>;
}

/// Settings this glue passes to the generic core along with itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlatData {
    pub phy_interface: PhyInterfaceMode,
    /// The MAC has the GMAC (rather than the MAC100) register layout
    pub has_gmac: bool,
    /// Zero disables the multicast hash filter; multicast is accepted
    /// promiscuously on this integration.
    pub multicast_filter_bins: u32,
    pub tx_fifo_size: u32,
    pub rx_fifo_size: u32,
}

impl PlatData {
    pub const FIFO_SIZE: u32 = 8192;

    pub fn new(phy_interface: PhyInterfaceMode) -> Self {
        Self {
            phy_interface,
            has_gmac: true,
            multicast_filter_bins: 0,
            tx_fifo_size: Self::FIFO_SIZE,
            rx_fifo_size: Self::FIFO_SIZE,
        }
    }
}

/// Hook the core calls whenever the negotiated link speed changes, including
/// at first link-up.  `speed` is in Mbps.
pub trait SetClkTxRate {
    fn set_clk_tx_rate(
        &mut self,
        interface: PhyInterfaceMode,
        speed: u32,
    ) -> Result<(), GmacError>;
}

/// The generic DWMAC driver, which takes over once the glue has configured
/// clocking.  `B` is the glue instance, which the core keeps and calls back
/// into through [SetClkTxRate].
pub trait StmmacCore<B: SetClkTxRate> {
    fn dvr_probe(&mut self, plat: PlatData, bsp: B) -> Result<(), GmacError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatible() {
        assert!(is_compatible("qcom,ipq806x-gmac"));
        assert!(!is_compatible("qcom,ipq806x"));
    }

    #[test]
    fn plat_data() {
        let p = PlatData::new(PhyInterfaceMode::Sgmii);
        assert!(p.has_gmac);
        assert_eq!(p.multicast_filter_bins, 0);
        assert_eq!((p.tx_fifo_size, p.rx_fifo_size), (8192, 8192));
    }
}
