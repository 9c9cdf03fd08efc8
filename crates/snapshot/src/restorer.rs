//! Reconstruction of carried items from persisted sequences.

use loadout_core::{Actor, EquipmentSlot, HostError, ItemFactory, ItemInstance, PropertyStore};
use tracing::{debug, warn};

use crate::codec::{decode_sequence, DecodedSlot};
use crate::descriptor::{ItemDescriptor, SequenceKind, SlotRef};
use crate::error::{LoadoutError, SlotProblem, SlotWarning};
use crate::keys::SnapshotKeys;

/// Where a stored half of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSource {
    /// Key present and decoded.
    Loaded,
    /// Key never written; treated as all-empty.
    Missing,
    /// Key present but not a JSON array; treated as all-empty.
    Malformed,
}

/// One persisted sequence after reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSequence {
    /// How the value was obtained.
    pub source: SequenceSource,
    /// Decoded elements (empty unless `source` is `Loaded`).
    pub slots: Vec<DecodedSlot>,
}

impl StoredSequence {
    /// Decode a raw property value.
    pub fn from_payload(kind: SequenceKind, key: &str, payload: Option<&str>) -> Self {
        let Some(payload) = payload else {
            return Self::empty(SequenceSource::Missing);
        };
        match decode_sequence(payload) {
            Ok(slots) => Self {
                source: SequenceSource::Loaded,
                slots,
            },
            Err(err) => {
                warn!(%key, "ignoring unreadable {kind} snapshot: {err}");
                Self::empty(SequenceSource::Malformed)
            }
        }
    }

    fn empty(source: SequenceSource) -> Self {
        Self {
            source,
            slots: Vec::new(),
        }
    }

    fn slot(&self, index: usize) -> Option<&DecodedSlot> {
        self.slots.get(index)
    }
}

/// Both halves of a snapshot, read before any slot is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLoadout {
    /// Worn-equipment half.
    pub armor: StoredSequence,
    /// Inventory half.
    pub inventory: StoredSequence,
}

impl StoredLoadout {
    /// Exactly one of the two halves was found.
    pub fn is_torn(&self) -> bool {
        (self.armor.source == SequenceSource::Missing)
            != (self.inventory.source == SequenceSource::Missing)
    }
}

/// Outcome of a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// How the armor half was obtained.
    pub armor: SequenceSource,
    /// How the inventory half was obtained.
    pub inventory: SequenceSource,
    /// Slots that received an item.
    pub restored: usize,
    /// Slots that were cleared (stored empty, missing, or failed).
    pub cleared: usize,
    /// Absorbed per-slot problems.
    pub warnings: Vec<SlotWarning>,
}

impl RestoreReport {
    fn new(stored: &StoredLoadout) -> Self {
        Self {
            armor: stored.armor.source,
            inventory: stored.inventory.source,
            restored: 0,
            cleared: 0,
            warnings: Vec::new(),
        }
    }

    /// No per-slot problems were absorbed.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Slots that were lost entirely.
    pub fn failed_slots(&self) -> impl Iterator<Item = SlotRef> + '_ {
        self.warnings
            .iter()
            .filter(|warning| warning.problem.is_fatal())
            .map(|warning| warning.slot)
    }

    fn warn(&mut self, slot: SlotRef, problem: SlotProblem) {
        warn!(%slot, "restore: {problem}");
        self.warnings.push(SlotWarning { slot, problem });
    }
}

/// Reads snapshots back into actors.
pub struct Restorer<'f, F> {
    factory: &'f F,
    keys: SnapshotKeys,
}

impl<'f, F: ItemFactory> Restorer<'f, F> {
    /// Restorer using the default key layout.
    pub fn new(factory: &'f F) -> Self {
        Self::with_keys(factory, SnapshotKeys::default())
    }

    /// Restorer using a custom key layout.
    pub fn with_keys(factory: &'f F, keys: SnapshotKeys) -> Self {
        Self { factory, keys }
    }

    /// Key layout in use.
    pub fn keys(&self) -> &SnapshotKeys {
        &self.keys
    }

    /// Read both halves of snapshot `name` from `storage`.
    ///
    /// Missing and unreadable halves are returned as empty; only host read
    /// failures are errors.
    pub fn load<S>(&self, name: &str, storage: &S) -> Result<StoredLoadout, LoadoutError>
    where
        S: PropertyStore + ?Sized,
    {
        let inventory_key = self.keys.inventory_key(name);
        let armor_key = self.keys.armor_key(name);
        let inventory = storage.property(&inventory_key)?;
        let armor = storage.property(&armor_key)?;

        let stored = StoredLoadout {
            armor: StoredSequence::from_payload(SequenceKind::Armor, &armor_key, armor.as_deref()),
            inventory: StoredSequence::from_payload(
                SequenceKind::Inventory,
                &inventory_key,
                inventory.as_deref(),
            ),
        };
        if stored.is_torn() {
            warn!(%name, "snapshot is torn: only one of armor/inventory was found");
        }
        Ok(stored)
    }

    /// Restore snapshot `name` (default: the actor's identifier) from the actor's
    /// own property store.
    pub fn restore<A>(
        &self,
        actor: &mut A,
        name: Option<&str>,
    ) -> Result<RestoreReport, LoadoutError>
    where
        A: Actor<Item = F::Item> + PropertyStore,
    {
        let name = name.unwrap_or(actor.identifier()).to_string();
        let stored = self.load(&name, &*actor)?;
        self.apply(actor, &stored)
    }

    /// Restore snapshot `name` (default: the actor's identifier) from another
    /// entity's property store.
    pub fn restore_from<A, S>(
        &self,
        actor: &mut A,
        name: Option<&str>,
        storage: &S,
    ) -> Result<RestoreReport, LoadoutError>
    where
        A: Actor<Item = F::Item> + ?Sized,
        S: PropertyStore + ?Sized,
    {
        let name = name.unwrap_or(actor.identifier()).to_string();
        let stored = self.load(&name, storage)?;
        self.apply(actor, &stored)
    }

    /// Place a previously loaded snapshot into `actor`'s slots.
    ///
    /// Every equipment slot and every inventory slot is assigned: stored items are
    /// rebuilt, everything else is cleared.
    pub fn apply<A>(
        &self,
        actor: &mut A,
        stored: &StoredLoadout,
    ) -> Result<RestoreReport, LoadoutError>
    where
        A: Actor<Item = F::Item> + ?Sized,
    {
        let mut report = RestoreReport::new(stored);

        for slot in EquipmentSlot::ALL {
            let item = self.rebuild(
                stored.armor.slot(slot.index()),
                SlotRef::Equipment(slot),
                &mut report,
            );
            place(&mut report, &item);
            actor.set_equipment(slot, item)?;
        }
        report_overflow(
            &stored.armor,
            SequenceKind::Armor,
            EquipmentSlot::ALL.len(),
            &mut report,
        );

        let capacity = actor.inventory_size();
        for index in 0..capacity {
            let item = self.rebuild(
                stored.inventory.slot(index),
                SlotRef::Inventory(index),
                &mut report,
            );
            place(&mut report, &item);
            actor.set_inventory_item(index, item)?;
        }
        report_overflow(&stored.inventory, SequenceKind::Inventory, capacity, &mut report);

        debug!(
            restored = report.restored,
            cleared = report.cleared,
            warnings = report.warnings.len(),
            "restore applied to {}",
            actor.identifier()
        );
        Ok(report)
    }

    /// Construct one item from a descriptor.
    ///
    /// Construction failure loses the item; rejected attributes and capabilities
    /// are skipped and returned alongside the item.
    pub fn build_item(
        &self,
        descriptor: &ItemDescriptor,
    ) -> Result<(F::Item, Vec<SlotProblem>), SlotProblem> {
        let mut item = self
            .factory
            .create_item(&descriptor.type_id)
            .map_err(|err| match err {
                HostError::UnknownItemType(type_id) => SlotProblem::UnknownItemType(type_id),
                other => SlotProblem::CreateFailed {
                    type_id: descriptor.type_id.clone(),
                    reason: other.to_string(),
                },
            })?;
        let mut problems = Vec::new();

        let props = &descriptor.props;
        if let Err(err) = item.set_amount(props.amount.get()) {
            problems.push(SlotProblem::PropertyRejected(err));
        }
        item.set_keep_on_death(props.keep_on_death);
        item.set_lock_mode(props.lock_mode);
        if let Some(name_tag) = &props.name_tag {
            item.set_name_tag(Some(name_tag.clone()));
        }
        item.set_lore(descriptor.lore.clone());

        if let Some(enchantments) = &descriptor.components.enchantable {
            match item.enchantable_mut() {
                Some(cap) => {
                    for enchantment in enchantments {
                        if let Err(err) = cap.add_enchantment(enchantment.clone()) {
                            problems.push(SlotProblem::EnchantmentRejected(err));
                        }
                    }
                }
                None if enchantments.is_empty() => {}
                None => problems.push(SlotProblem::NotEnchantable(descriptor.type_id.clone())),
            }
        }

        if let Some(damage) = descriptor.components.durability {
            match item.durability_mut() {
                Some(cap) => {
                    if let Err(err) = cap.set_damage(damage) {
                        problems.push(SlotProblem::DamageRejected(err));
                    }
                }
                None => problems.push(SlotProblem::NoDurability(descriptor.type_id.clone())),
            }
        }

        Ok((item, problems))
    }

    fn rebuild(
        &self,
        stored: Option<&DecodedSlot>,
        slot: SlotRef,
        report: &mut RestoreReport,
    ) -> Option<F::Item> {
        let descriptor = match stored? {
            DecodedSlot::Empty => return None,
            DecodedSlot::Item(descriptor) => descriptor,
            DecodedSlot::Malformed(reason) => {
                report.warn(slot, SlotProblem::MalformedDescriptor(reason.clone()));
                return None;
            }
        };
        match self.build_item(descriptor) {
            Ok((item, problems)) => {
                for problem in problems {
                    report.warn(slot, problem);
                }
                Some(item)
            }
            Err(problem) => {
                report.warn(slot, problem);
                None
            }
        }
    }
}

fn place<I>(report: &mut RestoreReport, item: &Option<I>) {
    if item.is_some() {
        report.restored += 1;
    } else {
        report.cleared += 1;
    }
}

fn report_overflow(
    stored: &StoredSequence,
    kind: SequenceKind,
    capacity: usize,
    report: &mut RestoreReport,
) {
    for (index, slot) in stored.slots.iter().enumerate().skip(capacity) {
        let problem = match slot {
            DecodedSlot::Empty => continue,
            DecodedSlot::Item(descriptor) => SlotProblem::NoSuchSlot(descriptor.type_id.clone()),
            DecodedSlot::Malformed(reason) => SlotProblem::MalformedDescriptor(reason.clone()),
        };
        report.warn(SlotRef::Overflow { kind, index }, problem);
    }
}
