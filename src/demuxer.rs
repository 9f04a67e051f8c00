use super::key::{LdsKey, UdsKey};
use super::packet::{KlvPacket, Standard};
use super::set::{LocalSet, UniversalSet};
use super::timeline::{Interval, Timeline};
use super::value::Value;
use super::{st0104, st0601, st0806, st0903, st1002, st1108};
use log::{error, warn};
use std::collections::HashMap;

// Values are valid for 30 seconds if not explicitly overridden.
pub(crate) const DEFAULT_DURATION: u64 = 30_000_000;

/// Folds a chronological stream of KLV packets into a [`Timeline`].
///
/// Packets must arrive in non-decreasing timestamp order; out-of-order
/// packets are dropped with a logged error. Malformed or unrecognized
/// packets are never lost: they accumulate on the timeline in raw form and
/// are re-emitted verbatim by the muxer.
///
/// # Example
///
/// ```no_run
/// use misb_io::{read_klv_packet, Demuxer, SliceReader, Timeline};
///
/// let bytes: Vec<u8> = std::fs::read("stream.klv").unwrap();
/// let mut timeline = Timeline::new();
/// let mut demuxer = Demuxer::new(&mut timeline);
/// let mut reader = SliceReader::new(&bytes);
/// while reader.remaining_len() > 0 {
///     match read_klv_packet(&mut reader) {
///         Ok(packet) => demuxer.demux_packet(&packet),
///         Err(_) => break,
///     }
/// }
/// ```
pub struct Demuxer<'a> {
    timeline: &'a mut Timeline,
    last_timestamp: u64,
    unknown_key_indices: HashMap<UdsKey, u64>,
}

impl<'a> Demuxer<'a> {
    /// Creates a demuxer filling `timeline`.
    pub fn new(timeline: &'a mut Timeline) -> Self {
        Self {
            timeline,
            last_timestamp: 0,
            unknown_key_indices: HashMap::new(),
        }
    }

    /// The timeline being filled.
    pub fn timeline(&self) -> &Timeline {
        self.timeline
    }

    /// Moves the demuxer's clock without consuming a packet.
    pub fn seek(&mut self, timestamp: u64) {
        self.last_timestamp = timestamp;
    }

    /// Forgets all per-stream state. The timeline itself is untouched.
    pub fn reset(&mut self) {
        self.last_timestamp = 0;
        self.unknown_key_indices.clear();
    }

    /// Consumes one packet, updating the timeline.
    pub fn demux_packet(&mut self, packet: &KlvPacket) {
        // Invalid or unrecognized packets are still saved in raw byte form
        if !packet.value.is_valid() {
            self.demux_unknown(packet);
            return;
        }

        match packet.standard() {
            Standard::Misb0102 => match packet.value.as_local_set() {
                Ok(set) => self.demux_local_set(Standard::Misb0102, set, None),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb0104 => match packet.value.as_universal_set() {
                Ok(set) => self.demux_0104(set),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb0601 => match packet.value.as_local_set() {
                Ok(set) => self.demux_0601(set),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb0806 => match packet.value.as_local_set() {
                Ok(set) => {
                    self.demux_local_set(Standard::Misb0806, set, Some(st0806::tag::TIMESTAMP))
                }
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb0903 => match packet.value.as_local_set() {
                Ok(set) => self.demux_local_set(
                    Standard::Misb0903,
                    set,
                    Some(st0903::tag::PRECISION_TIMESTAMP),
                ),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb1002 => match packet.value.as_local_set() {
                Ok(set) => self.demux_local_set(
                    Standard::Misb1002,
                    set,
                    Some(st1002::tag::PRECISION_TIMESTAMP),
                ),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb1108 => match packet.value.as_local_set() {
                Ok(set) => self.demux_1108(set),
                Err(_) => self.demux_unknown(packet),
            },
            Standard::Misb1202 | Standard::Misb1206 | Standard::Misb1601 => {
                match packet.value.as_local_set() {
                    Ok(set) => self.demux_local_set(packet.standard(), set, None),
                    Err(_) => self.demux_unknown(packet),
                }
            }
            Standard::Misb1204 => self.demux_1204(&packet.value),
            Standard::Unknown => self.demux_unknown(packet),
        }
    }

    // ------------------------------------------------------------------------
    fn demux_unknown(&mut self, packet: &KlvPacket) {
        // Keep track of which unknown keys map to which timelines
        let index = match self.unknown_key_indices.get(&packet.key) {
            Some(&index) => index,
            None => {
                let index = self.timeline.insert(Standard::Unknown, 0);
                self.unknown_key_indices.insert(packet.key, index);
                index
            }
        };

        // Add this packet to a list (created here if necessary) of unknown
        // packets at this timestamp. The demuxer clock is used because a
        // timestamp cannot be extracted from a packet of unknown format.
        let timestamp = self.last_timestamp;
        let timeline = self.timeline.entry(Standard::Unknown, 0, index);
        match timeline.find_mut(timestamp) {
            Some((_, value)) => match value.as_packets_mut() {
                Ok(packets) => packets.push(packet.clone()),
                Err(err) => error!("unknown-packet timeline corrupted: {}", err),
            },
            None => timeline.set(
                Interval::new(timestamp, timestamp + 1),
                Value::from(vec![packet.clone()]),
            ),
        }
    }

    // ------------------------------------------------------------------------
    fn demux_0104(&mut self, set: &UniversalSet) {
        let standard = Standard::Misb0104;
        let lookup = st0104::traits();
        let timestamp_key = lookup
            .by_tag(st0104::tag::USER_DEFINED_TIMESTAMP)
            .uds_key();

        let timestamp = match set.at(timestamp_key).ok().and_then(|v| v.as_u64().ok()) {
            Some(timestamp) => timestamp,
            None => {
                warn!("demuxer: 0104 set without user-defined timestamp");
                return;
            }
        };
        if !self.check_timestamp(timestamp) {
            return;
        }

        let interval = Interval::new(timestamp, timestamp + DEFAULT_DURATION);
        for (key, value) in set.iter() {
            // Timestamp already implicitly encoded
            if *key == timestamp_key {
                continue;
            }
            // No duplicate entries allowed, so this is straightforward
            let tag = lookup.by_uds_key(*key).tag();
            self.demux_single_entry(standard, tag, 0, interval, value);
        }

        self.last_timestamp = timestamp;
    }

    // ------------------------------------------------------------------------
    fn demux_0601(&mut self, set: &LocalSet) {
        let standard = Standard::Misb0601;

        let timestamp = match set
            .at(st0601::tag::PRECISION_TIMESTAMP)
            .ok()
            .and_then(|v| v.as_u64().ok())
        {
            Some(timestamp) => timestamp,
            None => {
                warn!("demuxer: 0601 set without precision timestamp");
                return;
            }
        };
        if !self.check_timestamp(timestamp) {
            return;
        }

        let interval = Interval::new(timestamp, timestamp + DEFAULT_DURATION);
        let moment = Interval::new(timestamp, timestamp + 1);
        for (tag, value) in set.iter() {
            match *tag {
                // Tags which only make sense as point occurrences
                st0601::tag::WEAPON_FIRED
                | st0601::tag::CONTROL_COMMAND_VERIFICATION_LIST => {
                    self.demux_single_entry(standard, *tag, 0, moment, value);
                }
                st0601::tag::SEGMENT_LOCAL_SET | st0601::tag::AMEND_LOCAL_SET => {
                    // Multiples are expected; every occurrence gets its own
                    // sub-timeline
                    if !value.is_empty() {
                        let index = self.timeline.insert(standard, *tag);
                        self.timeline
                            .entry(standard, *tag, index)
                            .set(moment, value.clone());
                    }
                }

                // CONTROL_COMMAND supports multiple entries, but carries a
                // unique id usable to track each entry over time, so it can
                // be treated like a single-entry tag
                st0601::tag::CONTROL_COMMAND => {
                    let index = value
                        .as_control_command()
                        .map(|command| u64::from(command.id))
                        .unwrap_or(0);
                    self.demux_single_entry(standard, *tag, index, interval, value);
                }

                _ => self.demux_single_entry(standard, *tag, 0, interval, value),
            }
        }

        self.last_timestamp = timestamp;
    }

    // ------------------------------------------------------------------------
    fn demux_1108(&mut self, set: &LocalSet) {
        let standard = Standard::Misb1108;

        let period = match set
            .at(st1108::tag::METRIC_PERIOD_PACK)
            .ok()
            .and_then(|v| v.as_metric_period().ok().copied())
        {
            Some(period) => period,
            None => {
                warn!("demuxer: 1108 set without metric period pack");
                return;
            }
        };
        if !self.check_timestamp(period.timestamp) {
            return;
        }

        // Valid for the period of time specified in the metric period pack
        let interval = Interval::new(
            period.timestamp,
            period.timestamp + u64::from(period.offset),
        );

        // Each 1108 local set can have multiple metrics, each contained in
        // its own metric local set. Items in the parent set are shared among
        // the metric sets. One index is created per *metric set*, with the
        // parent's common data copied to each.
        let metric_values: Vec<Value> = set
            .all_at(st1108::tag::METRIC_LOCAL_SET)
            .cloned()
            .collect();
        for metric_value in &metric_values {
            let index = self.find_or_insert_1108(set, metric_value);
            self.demux_single_entry(
                standard,
                st1108::tag::METRIC_LOCAL_SET,
                index,
                interval,
                metric_value,
            );

            // Copy the parent's data to this metric set's index
            for (tag, value) in set.iter() {
                if *tag == st1108::tag::METRIC_LOCAL_SET
                    || *tag == st1108::tag::METRIC_PERIOD_PACK
                {
                    continue;
                }
                self.demux_single_entry(standard, *tag, index, interval, value);
            }
        }

        self.last_timestamp = period.timestamp;
    }

    // Find the index of the sub-timeline group tracking the same metric in
    // the same parent context, or allocate a fresh one. Invalid metric sets
    // are all treated as unique.
    fn find_or_insert_1108(&mut self, parent_set: &LocalSet, metric_value: &Value) -> u64 {
        let standard = Standard::Misb1108;

        if let Ok(metric_set) = metric_value.as_local_set() {
            let candidates: Vec<u64> = self
                .timeline
                .find_all_tag(standard, st1108::tag::METRIC_LOCAL_SET)
                .map(|(key, _)| key.index)
                .collect();

            'candidate: for index in candidates {
                // Either of these parent tags differing means the new metric
                // must be tracked separately
                for tag in [
                    st1108::tag::ASSESSMENT_POINT,
                    st1108::tag::WINDOW_CORNERS_PACK,
                ] {
                    if let Some(existing) = self
                        .timeline
                        .get(standard, tag, index)
                        .and_then(|timeline| timeline.first())
                        .map(|(_, value)| value)
                    {
                        let parent_value = parent_set.at(tag).ok();
                        if existing.is_empty() != parent_value.is_none() {
                            continue 'candidate;
                        }
                        if let Some(parent_value) = parent_value {
                            if existing != parent_value {
                                continue 'candidate;
                            }
                        }
                    }
                }

                // Compare against the candidate's embedded metric set
                let candidate_set = match self
                    .timeline
                    .get(standard, st1108::tag::METRIC_LOCAL_SET, index)
                    .and_then(|timeline| timeline.first())
                    .and_then(|(_, value)| value.as_local_set().ok())
                {
                    Some(candidate_set) => candidate_set,
                    None => continue,
                };

                // Any of these identity tags differing means the new metric
                // must be tracked separately
                for tag in [
                    st1108::metric_tag::NAME,
                    st1108::metric_tag::VERSION,
                    st1108::metric_tag::IMPLEMENTER,
                    st1108::metric_tag::PARAMETERS,
                ] {
                    if candidate_set.at(tag).ok() != metric_set.at(tag).ok() {
                        continue 'candidate;
                    }
                }

                return index;
            }
        }

        // No equivalent group exists; allocate the next free index
        self.timeline
            .find_all_tag(standard, st1108::tag::METRIC_LOCAL_SET)
            .last()
            .map(|(key, _)| key.index + 1)
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    fn demux_1204(&mut self, value: &Value) {
        let timestamp = self.last_timestamp;
        let interval = Interval::new(timestamp, timestamp + DEFAULT_DURATION);
        self.demux_single_entry(Standard::Misb1204, 0, 0, interval, value);
    }

    // ------------------------------------------------------------------------
    fn demux_local_set(
        &mut self,
        standard: Standard,
        set: &LocalSet,
        timestamp_tag: Option<LdsKey>,
    ) {
        let timestamp = match timestamp_tag {
            Some(tag) => match set.at(tag).ok().and_then(|v| v.as_u64().ok()) {
                Some(timestamp) => timestamp,
                None => {
                    warn!("demuxer: {:?} set without its timestamp tag", standard);
                    return;
                }
            },
            // No temporal anchor of its own; the packet clock rules
            None => self.last_timestamp,
        };
        if !self.check_timestamp(timestamp) {
            return;
        }

        let interval = Interval::new(timestamp, timestamp + DEFAULT_DURATION);
        for (tag, value) in set.iter() {
            if Some(*tag) == timestamp_tag {
                continue;
            }
            self.demux_single_entry(standard, *tag, 0, interval, value);
        }

        self.last_timestamp = timestamp;
    }

    // ------------------------------------------------------------------------
    fn demux_single_entry(
        &mut self,
        standard: Standard,
        tag: LdsKey,
        index: u64,
        interval: Interval,
        value: &Value,
    ) {
        if value.is_empty() {
            // Null value: erase the timespan instead of adding a null entry.
            // Only possible for single-instance tags.
            let erase = match self.timeline.find(standard, tag) {
                Err(_) => {
                    warn!(
                        "demuxer: cannot cancel multi-instance tag {} of {:?}",
                        tag, standard
                    );
                    return;
                }
                Ok(None) => return,
                Ok(Some((key, timeline))) => match timeline.find(interval.lower) {
                    None => return,
                    Some((found, _)) => (key.index, found.upper),
                },
            };
            self.timeline
                .entry(standard, tag, erase.0)
                .erase(Interval::new(interval.lower, erase.1));
        } else {
            // Non-null value: add a new entry
            self.timeline
                .entry(standard, tag, index)
                .set(interval, value.clone());
        }
    }

    // ------------------------------------------------------------------------
    // Packets *must* be fed to the demuxer in chronological order to prevent
    // older packets from incorrectly overriding newer ones.
    fn check_timestamp(&self, timestamp: u64) -> bool {
        let result = timestamp >= self.last_timestamp;
        if !result {
            error!(
                "demuxer: dropping out-of-order packet ( {} less than {} )",
                timestamp, self.last_timestamp
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::st0601::tag as t0601;

    fn minimal_0601_set(timestamp: u64, version: u64) -> LocalSet {
        let mut set = LocalSet::new();
        set.add(t0601::PRECISION_TIMESTAMP, timestamp);
        set.add(t0601::VERSION_NUMBER, version);
        set
    }

    #[test]
    fn fields_take_effect_for_the_default_duration() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        let packet = KlvPacket::new(crate::st0601::key(), minimal_0601_set(1_000, 17));
        demuxer.demux_packet(&packet);

        assert_eq!(
            timeline
                .at(Standard::Misb0601, t0601::VERSION_NUMBER, 1_000)
                .unwrap(),
            Value::from(17_u64)
        );
        assert_eq!(
            timeline
                .at(
                    Standard::Misb0601,
                    t0601::VERSION_NUMBER,
                    1_000 + DEFAULT_DURATION - 1
                )
                .unwrap(),
            Value::from(17_u64)
        );
        assert!(timeline
            .at(
                Standard::Misb0601,
                t0601::VERSION_NUMBER,
                1_000 + DEFAULT_DURATION
            )
            .unwrap()
            .is_empty());
    }

    #[test]
    fn out_of_order_packets_are_dropped() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        demuxer.demux_packet(&KlvPacket::new(
            crate::st0601::key(),
            minimal_0601_set(10_000, 17),
        ));
        demuxer.demux_packet(&KlvPacket::new(
            crate::st0601::key(),
            minimal_0601_set(5_000, 18),
        ));

        // The older packet must not have modified the timeline
        assert_eq!(
            timeline
                .at(Standard::Misb0601, t0601::VERSION_NUMBER, 10_000)
                .unwrap(),
            Value::from(17_u64)
        );
        assert!(timeline
            .at(Standard::Misb0601, t0601::VERSION_NUMBER, 5_000)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_values_cancel_prior_entries() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        demuxer.demux_packet(&KlvPacket::new(
            crate::st0601::key(),
            minimal_0601_set(1_000, 17),
        ));

        let mut cancel = minimal_0601_set(2_000, 17);
        cancel.add(t0601::MISSION_ID, Value::empty());
        // First install the mission id, then cancel it
        let mut install = minimal_0601_set(1_500, 17);
        install.add(t0601::MISSION_ID, "MISSION01");
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), install));
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), cancel));

        assert!(!timeline
            .at(Standard::Misb0601, t0601::MISSION_ID, 1_999)
            .unwrap()
            .is_empty());
        assert!(timeline
            .at(Standard::Misb0601, t0601::MISSION_ID, 2_000)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn control_commands_index_by_id() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        let mut set = minimal_0601_set(1_000, 17);
        set.add(
            t0601::CONTROL_COMMAND,
            crate::st0601::ControlCommand {
                id: 3,
                message: "Orbit".to_owned(),
                timestamp: 0,
            },
        );
        set.add(
            t0601::CONTROL_COMMAND,
            crate::st0601::ControlCommand {
                id: 9,
                message: "Descend".to_owned(),
                timestamp: 0,
            },
        );
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), set));

        assert!(timeline
            .get(Standard::Misb0601, t0601::CONTROL_COMMAND, 3)
            .is_some());
        assert!(timeline
            .get(Standard::Misb0601, t0601::CONTROL_COMMAND, 9)
            .is_some());
        assert_eq!(
            timeline
                .all_at(Standard::Misb0601, t0601::CONTROL_COMMAND, 1_000)
                .len(),
            2
        );
    }

    #[test]
    fn unknown_packets_accumulate_in_lists() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        let key = UdsKey::new(0x060E2B34_04010101, 0x0102030405060708);
        let packet = KlvPacket::new(key, Value::from(crate::Blob::from(&[1_u8, 2, 3][..])));
        demuxer.demux_packet(&packet);
        demuxer.demux_packet(&packet);

        let (_, unknown) = timeline.find(Standard::Unknown, 0).unwrap().unwrap();
        let (_, value) = unknown.find(0).unwrap();
        assert_eq!(value.as_packets().unwrap().len(), 2);
    }
}
