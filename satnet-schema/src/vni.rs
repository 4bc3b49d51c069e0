//! Deterministic VXLAN Network Identifier derivation (§3, §8).

const VNI_MODULUS: u32 = (1 << 24) - 1;

/// Canonical link identity: the two endpoints ordered so that both agents
/// independently converge on the same tuple regardless of which side
/// initiated the link record (§3 invariant: "a link's two halves share the
/// same logical identity").
pub fn canonical_identity<'a>(
    ep1: &'a str,
    ant1: u32,
    ep2: &'a str,
    ant2: u32,
) -> (&'a str, u32, &'a str, u32) {
    if (ep1, ant1) <= (ep2, ant2) {
        (ep1, ant1, ep2, ant2)
    } else {
        (ep2, ant2, ep1, ant1)
    }
}

/// Computes the 24-bit VNI for an ordered endpoint tuple.
///
/// `cksum(ordered tuple) mod (2^24 - 1) + 1`, always in `[1, 2^24 - 1]`.
pub fn compute_vni(ep1: &str, ant1: u32, ep2: &str, ant2: u32) -> u32 {
    let (a, aa, b, bb) = canonical_identity(ep1, ant1, ep2, ant2);
    let input = format!("{a}_{aa}_{b}_{bb}");
    let checksum = crc32fast::hash(input.as_bytes());
    (checksum % VNI_MODULUS) + 1
}
