//! Overlay address allocation (§4.1 step 3).

use std::collections::HashSet;

use proxmox_network_types::ip_address::{Cidr, Ipv4Cidr, Ipv6Cidr};
use satnet_schema::error::SatNetError;
use satnet_schema::model::{AddressRule, NodeConfigEntry};

const V4_PREFIX: u8 = 30;
const V6_PREFIX: u8 = 126;

/// Successive-subnet allocator over a super-CIDR, skipping subnets already
/// consumed by explicit overrides.
struct SubnetCursor {
    base: u128,
    host_bits: u32,
    block_count: u128,
    next_index: u128,
    consumed: HashSet<u128>,
}

impl SubnetCursor {
    fn new_v4(super_cidr: &Ipv4Cidr, prefix: u8, consumed: &HashSet<Ipv4Cidr>) -> Self {
        let host_bits = (32 - prefix) as u32;
        let base = u32::from(*super_cidr.address()) as u128;
        let block_count = 1u128 << (32 - super_cidr.mask()) as u32 >> host_bits;
        let consumed_idx = consumed
            .iter()
            .map(|c| {
                let addr = u32::from(*c.address()) as u128;
                (addr - base) >> host_bits
            })
            .collect();
        Self {
            base,
            host_bits,
            block_count,
            next_index: 0,
            consumed: consumed_idx,
        }
    }

    fn new_v6(super_cidr: &Ipv6Cidr, prefix: u8, consumed: &HashSet<Ipv6Cidr>) -> Self {
        let host_bits = (128 - prefix) as u32;
        let base = u128::from(*super_cidr.address());
        let block_count = 1u128
            .checked_shl((128 - super_cidr.mask()) as u32)
            .unwrap_or(0)
            >> host_bits;
        let consumed_idx = consumed
            .iter()
            .map(|c| {
                let addr = u128::from(*c.address());
                (addr - base) >> host_bits
            })
            .collect();
        Self {
            base,
            host_bits,
            block_count,
            next_index: 0,
            consumed: consumed_idx,
        }
    }

    /// Returns the base address (as an integer) of the next unconsumed block.
    fn next(&mut self) -> Option<u128> {
        while self.next_index < self.block_count {
            let idx = self.next_index;
            self.next_index += 1;
            if !self.consumed.contains(&idx) {
                return Some(self.base + (idx << self.host_bits));
            }
        }
        None
    }
}

/// Result of address allocation for one node.
#[derive(Debug, Clone, Default)]
pub struct AssignedAddresses {
    pub cidr: Option<String>,
    pub cidr_v6: Option<String>,
}

/// Allocates `/30` (v4) and `/126` (v6) overlay subnets to every node with
/// `auto-assign-ips`, matching `auto-assign-super-cidr` rules by node type
/// in input order, with an `any` rule applied last as a fallback.
pub fn allocate_addresses(
    nodes: &[NodeConfigEntry],
    rules: &[AddressRule],
) -> Result<std::collections::HashMap<String, AssignedAddresses>, SatNetError> {
    let mut result = std::collections::HashMap::new();

    let mut explicit_v4: HashSet<Ipv4Cidr> = HashSet::new();
    let mut explicit_v6: HashSet<Ipv6Cidr> = HashSet::new();
    for node in nodes {
        if let Some(cidr) = &node.l3_config.cidr {
            if let Ok(Cidr::Ipv4(c)) = cidr.parse::<Cidr>() {
                explicit_v4.insert(c.canonical());
            }
        }
        if let Some(cidr) = &node.l3_config.cidr_v6 {
            if let Ok(Cidr::Ipv6(c)) = cidr.parse::<Cidr>() {
                explicit_v6.insert(c.canonical());
            }
        }
    }

    // `any` rules are a fallback applied last regardless of their position
    // in the input; all other rules keep input order.
    let mut ordered_rules: Vec<&AddressRule> = rules.iter().filter(|r| r.match_type != "any").collect();
    ordered_rules.extend(rules.iter().filter(|r| r.match_type == "any"));

    let mut assigned: HashSet<String> = HashSet::new();

    for rule in ordered_rules {
        let super_v4: Option<Ipv4Cidr> = match rule.super_cidr.parse::<Cidr>() {
            Ok(Cidr::Ipv4(c)) => Some(c),
            _ => None,
        };
        let super_v6: Option<Ipv6Cidr> = match &rule.super_cidr_v6 {
            Some(s) => match s.parse::<Cidr>() {
                Ok(Cidr::Ipv6(c)) => Some(c),
                _ => None,
            },
            None => None,
        };

        let mut v4_cursor = super_v4
            .as_ref()
            .map(|c| SubnetCursor::new_v4(c, V4_PREFIX, &explicit_v4));
        let mut v6_cursor = super_v6
            .as_ref()
            .map(|c| SubnetCursor::new_v6(c, V6_PREFIX, &explicit_v6));

        for node in nodes {
            if assigned.contains(&node.name) {
                continue;
            }
            if !node.l3_config.auto_assign_ips {
                continue;
            }
            let matches = rule.match_type == "any" || rule.match_type == node.node_type;
            if !matches {
                continue;
            }

            let mut entry = AssignedAddresses::default();

            if node.l3_config.cidr.is_some() {
                entry.cidr = node.l3_config.cidr.clone();
            } else if let Some(cursor) = v4_cursor.as_mut() {
                let addr = cursor.next().ok_or_else(|| SatNetError::AddressPoolExhausted {
                    rule: rule.super_cidr.clone(),
                })?;
                let ip = std::net::Ipv4Addr::from(addr as u32);
                entry.cidr = Some(format!("{ip}/{V4_PREFIX}"));
            }

            if node.l3_config.cidr_v6.is_some() {
                entry.cidr_v6 = node.l3_config.cidr_v6.clone();
            } else if let Some(cursor) = v6_cursor.as_mut() {
                let addr = cursor.next().ok_or_else(|| SatNetError::AddressPoolExhausted {
                    rule: rule
                        .super_cidr_v6
                        .clone()
                        .unwrap_or_else(|| rule.super_cidr.clone()),
                })?;
                let ip = std::net::Ipv6Addr::from(addr);
                entry.cidr_v6 = Some(format!("{ip}/{V6_PREFIX}"));
            }

            assigned.insert(node.name.clone());
            result.insert(node.name.clone(), entry);
        }
    }

    Ok(result)
}
