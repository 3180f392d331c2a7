use dledger_types::Name;

/// Name component under which NOTIF messages are published: `<mcPrefix>/NOTIF/...`.
pub const NOTIF_LABEL: &str = "NOTIF";
/// Name component under which SYNC messages are published: `<mcPrefix>/SYNC/...`.
pub const SYNC_LABEL: &str = "SYNC";

/// Bound on how many tip names a single SYNC message carries before the
/// local tip set is split across several SYNC names. A deliberate bound,
/// not a silent truncation — callers that exceed it get multiple names back.
pub const MAX_SYNC_TIPS: usize = 32;

/// This reference implementation assumes every producer identity prefix is
/// exactly one name component, so that a single SYNC name carrying several
/// tip names can be unambiguously split back into individual
/// `<producer>/<digest>` pairs without any string-scanning — see
/// [`tips_from_sync`].
const RECORD_SUFFIX_LEN: usize = 2;

/// Build the NOTIF name for a freshly admitted record:
/// `<mcPrefix>/NOTIF/<producerSuffix>/<digest>`.
pub fn notif_name(mc_prefix: &Name, producer_suffix: &Name, digest_component: &str) -> Name {
    mc_prefix.append(NOTIF_LABEL).join(producer_suffix).append(digest_component)
}

/// Recover the record name a NOTIF refers to, given the federation's
/// multicast prefix. `None` if `notif_name` is not under
/// `<mcPrefix>/NOTIF/`.
pub fn record_name_from_notif(mc_prefix: &Name, notif_name: &Name) -> Option<Name> {
    let notif_prefix = mc_prefix.append(NOTIF_LABEL);
    let suffix = notif_name.strip_prefix(&notif_prefix)?;
    Some(mc_prefix.join(&suffix))
}

/// Build the SYNC name(s) carrying `tips`: `<mcPrefix>/SYNC/<tip1>/<tip2>/...`.
/// Returns more than one name if `tips` exceeds [`MAX_SYNC_TIPS`].
pub fn sync_names(mc_prefix: &Name, tips: &[Name]) -> Vec<Name> {
    let sync_prefix = mc_prefix.append(SYNC_LABEL);
    tips.chunks(MAX_SYNC_TIPS)
        .map(|chunk| chunk.iter().fold(sync_prefix.clone(), |name, tip| name.join(tip)))
        .collect()
}

/// Recover the list of tip names carried by a SYNC name. `None` if
/// `sync_name` is not under `<mcPrefix>/SYNC/` or its suffix isn't a whole
/// number of `<producer>/<digest>` pairs.
pub fn tips_from_sync(mc_prefix: &Name, sync_name: &Name) -> Option<Vec<Name>> {
    let sync_prefix = mc_prefix.append(SYNC_LABEL);
    let suffix = sync_name.strip_prefix(&sync_prefix)?;
    if suffix.len() % RECORD_SUFFIX_LEN != 0 {
        return None;
    }
    Some(
        suffix
            .components()
            .chunks(RECORD_SUFFIX_LEN)
            .map(|pair| mc_prefix.join(&Name::from_components(pair.to_vec())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc_prefix() -> Name {
        Name::from_components(["dledger", "fed-1"])
    }

    #[test]
    fn notif_round_trips() {
        let mc = mc_prefix();
        let producer = Name::from_components(["alice"]);
        let n = notif_name(&mc, &producer, "deadbeef");
        assert_eq!(n.to_string(), "/dledger/fed-1/NOTIF/alice/deadbeef");
        let recovered = record_name_from_notif(&mc, &n).unwrap();
        assert_eq!(recovered.to_string(), "/dledger/fed-1/alice/deadbeef");
    }

    #[test]
    fn sync_round_trips_multiple_tips() {
        let mc = mc_prefix();
        let tips = vec![
            mc.append("alice").append("digest1"),
            mc.append("bob").append("digest2"),
        ];
        let names = sync_names(&mc, &tips);
        assert_eq!(names.len(), 1);
        let recovered = tips_from_sync(&mc, &names[0]).unwrap();
        assert_eq!(recovered, tips);
    }

    #[test]
    fn sync_splits_when_over_bound() {
        let mc = mc_prefix();
        let tips: Vec<Name> =
            (0..MAX_SYNC_TIPS + 5).map(|i| mc.append(format!("peer-{i}")).append("d")).collect();
        let names = sync_names(&mc, &tips);
        assert_eq!(names.len(), 2);
        let mut recovered = tips_from_sync(&mc, &names[0]).unwrap();
        recovered.extend(tips_from_sync(&mc, &names[1]).unwrap());
        assert_eq!(recovered, tips);
    }
}
