// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clock divider and gate selection for the per-GMAC RX/TX clocks
use crate::config::{GmacId, Iface, PhyInterfaceMode, Speed};
use crate::regs::{self, NSS_COMMON_CLK_DIV_MASK};
use crate::GmacError;
use static_assertions::const_assert;

/// Divider values, indexed by speed.  The same physical divider feeds RGMII
/// and GMII, so the two tables differ only in the ratio they assume.
const RGMII_DIV: [(Speed, u32); 3] = [
    (Speed::Speed1G, 1),
    (Speed::Speed100M, 9),
    (Speed::Speed10M, 99),
];
const SGMII_DIV: [(Speed, u32); 3] = [
    (Speed::Speed1G, 0),
    (Speed::Speed100M, 4),
    (Speed::Speed10M, 49),
];

const_assert!(99 <= NSS_COMMON_CLK_DIV_MASK);

fn table(iface: Iface) -> &'static [(Speed, u32); 3] {
    match iface {
        Iface::Rgmii => &RGMII_DIV,
        Iface::Sgmii => &SGMII_DIV,
    }
}

/// Looks up the NSS clock divider for a mode and link speed (in Mbps).
pub fn clk_div(mode: PhyInterfaceMode, speed: u32) -> Result<u32, GmacError> {
    let iface = mode.supported_iface()?;
    Speed::from_mbps(speed)
        .and_then(|s| {
            table(iface)
                .iter()
                .find(|(t, _)| *t == s)
                .map(|(_, div)| *div)
        })
        .ok_or(GmacError::UnsupportedSpeed { mode, speed })
}

/// Returns the RX and TX gate-enable bits for this GMAC.  RGMII and GMII use
/// different bits of the same gate register.
pub fn clk_gate_bits(id: GmacId, iface: Iface) -> u32 {
    match iface {
        Iface::Rgmii => {
            regs::clk_gate_rgmii_rx_en(id) | regs::clk_gate_rgmii_tx_en(id)
        }
        Iface::Sgmii => {
            regs::clk_gate_gmii_rx_en(id) | regs::clk_gate_gmii_tx_en(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use PhyInterfaceMode::*;

    const RGMII_FAMILY: [PhyInterfaceMode; 4] =
        [Rgmii, RgmiiId, RgmiiRxid, RgmiiTxid];

    #[test]
    fn rgmii_dividers() {
        for mode in RGMII_FAMILY {
            assert_eq!(clk_div(mode, 1000), Ok(1));
            assert_eq!(clk_div(mode, 100), Ok(9));
            assert_eq!(clk_div(mode, 10), Ok(99));
        }
    }

    #[test]
    fn sgmii_dividers() {
        assert_eq!(clk_div(Sgmii, 1000), Ok(0));
        assert_eq!(clk_div(Sgmii, 100), Ok(4));
        assert_eq!(clk_div(Sgmii, 10), Ok(49));
    }

    #[test]
    fn unsupported_mode() {
        assert_eq!(
            clk_div(Rmii, 100),
            Err(GmacError::UnsupportedInterface(Rmii))
        );
    }

    #[test]
    fn gate_bits() {
        let id = GmacId::new(2).unwrap();
        assert_eq!(clk_gate_bits(id, Iface::Rgmii), 0b11 << 12);
        assert_eq!(clk_gate_bits(id, Iface::Sgmii), (1 << 6) | (1 << 2));
    }

    proptest! {
        #[test]
        fn odd_speeds_are_rejected(
            speed in any::<u32>().prop_filter("supported", |s| {
                !matches!(s, 10 | 100 | 1000)
            }),
            mode in prop::sample::select(vec![
                Rgmii, RgmiiId, RgmiiRxid, RgmiiTxid, Sgmii,
            ]),
        ) {
            prop_assert_eq!(
                clk_div(mode, speed),
                Err(GmacError::UnsupportedSpeed { mode, speed })
            );
        }
    }
}
