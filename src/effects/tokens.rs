//! Token materialization.
//!
//! ## Virtualization
//!
//! A request for more tokens than `physical_token_cap` creates the cap's
//! worth of concrete tokens plus exactly one virtual stack. The stack's
//! `token_count` is the full request and `hidden_remainder` is the part
//! never materialized. Entry discovery is suppressed for the stack, so
//! "whenever a token enters" watchers fire for the concrete tokens only.
//!
//! ## Roles
//!
//! A permanent may carry at most one Role per controller. Attaching a new
//! Role sends that controller's existing Roles on the host to the
//! graveyard. When several Roles are created on one host at once, only the
//! last survives, so only it is materialized.

use crate::zones::{leave_battlefield, Zone};
use crate::cards::{Permanent, TokenShape, VirtualStack};
use crate::core::{Board, EngineError, PermanentId, PlayerId, Quantity};

/// Permanents produced by one creation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenBatch {
    /// Concrete tokens, in creation order. These get entry discovery.
    pub concrete: Vec<PermanentId>,
    /// Virtual stacks, one per creation that exceeded the cap.
    pub stacks: Vec<PermanentId>,
}

impl TokenBatch {
    /// Every permanent created, stacks last.
    #[must_use]
    pub fn all(&self) -> Vec<PermanentId> {
        self.concrete.iter().chain(&self.stacks).copied().collect()
    }

    /// Check if nothing was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concrete.is_empty() && self.stacks.is_empty()
    }

    fn extend(&mut self, other: TokenBatch) {
        self.concrete.extend(other.concrete);
        self.stacks.extend(other.stacks);
    }
}

/// Create `count` tokens of a shape, virtualizing above `cap`.
pub fn create_tokens(
    board: &mut Board,
    shape: &TokenShape,
    controller: PlayerId,
    count: &Quantity,
    cap: usize,
) -> TokenBatch {
    let mut batch = TokenBatch::default();
    let cap_quantity = Quantity::from(cap);
    let concrete = if *count > cap_quantity {
        cap
    } else {
        count.to_usize().unwrap_or(cap)
    };

    for _ in 0..concrete {
        batch
            .concrete
            .push(board.add(Permanent::from_shape(shape, controller)));
    }

    if *count > cap_quantity {
        let mut stack = Permanent::from_shape(shape, controller);
        stack.virtual_stack = Some(VirtualStack {
            token_count: count.clone(),
            hidden_remainder: count.saturating_sub(&cap_quantity),
            suppress_enter_triggers: true,
        });
        let id = board.add(stack);
        tracing::debug!(
            token = %shape.name,
            count = %count,
            cap,
            stack = %id,
            "token creation virtualized"
        );
        batch.stacks.push(id);
    }

    batch
}

/// Create `count` token copies of each target.
pub fn create_copies(
    board: &mut Board,
    targets: &[PermanentId],
    controller: PlayerId,
    count: &Quantity,
    cap: usize,
) -> Result<TokenBatch, EngineError> {
    let mut batch = TokenBatch::default();
    for &target in targets {
        let shape = board.require(target)?.copiable_shape();
        batch.extend(create_tokens(board, &shape, controller, count, cap));
    }
    Ok(batch)
}

/// Attach a Role to a host, collapsing the controller's existing Roles
/// there. Returns the surviving Role and log lines.
pub fn create_role(
    board: &mut Board,
    shape: &TokenShape,
    controller: PlayerId,
    host: PermanentId,
    count: &Quantity,
) -> Result<(Option<PermanentId>, Vec<String>), EngineError> {
    let mut log = Vec::new();
    if count.is_zero() {
        return Ok((None, log));
    }
    if !board.is_on_battlefield(host) {
        return Err(EngineError::UnknownPermanent(host));
    }

    let existing: Vec<PermanentId> = board
        .attachments_of(host)
        .filter(|p| p.is_role() && p.controller == controller)
        .map(|p| p.id)
        .collect();
    for role in existing {
        log.extend(leave_battlefield(board, role, Zone::Graveyard)?);
    }

    let extras = count.saturating_sub(&Quantity::one());
    if !extras.is_zero() {
        log.push(format!("{} earlier {} token(s) collapse immediately", extras, shape.name));
    }

    let mut role = Permanent::from_shape(shape, controller).attached_to(host);
    role.zone = Zone::Attached;
    let id = board.add(role);
    log.push(format!("{} is attached to {}", shape.name, board.require(host)?.name));
    Ok((Some(id), log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::StatBonus;

    fn soldier() -> TokenShape {
        TokenShape::creature("Soldier", 1, 1)
    }

    #[test]
    fn test_exactly_cap_is_concrete() {
        let mut board = Board::new();
        let batch = create_tokens(&mut board, &soldier(), PlayerId::YOU, &Quantity::from(5u64), 5);
        assert_eq!(batch.concrete.len(), 5);
        assert!(batch.stacks.is_empty());
        assert!(board.iter().all(|p| p.is_token && !p.is_virtual_stack()));
    }

    #[test]
    fn test_one_over_cap_adds_stack() {
        let mut board = Board::new();
        let batch = create_tokens(&mut board, &soldier(), PlayerId::YOU, &Quantity::from(6u64), 5);
        assert_eq!(batch.concrete.len(), 5);

        let stack = board.get(batch.stacks[0]).unwrap();
        let data = stack.virtual_stack.as_ref().unwrap();
        assert_eq!(data.token_count, Quantity::from(6u64));
        assert_eq!(data.hidden_remainder, Quantity::one());
        assert!(data.suppress_enter_triggers);
        assert_eq!(board.len(), 6);
    }

    #[test]
    fn test_astronomical_count() {
        let mut board = Board::new();
        let huge = Quantity::one().mul_pow_exact(2, 200);
        let batch = create_tokens(&mut board, &soldier(), PlayerId::YOU, &huge, 3);
        assert_eq!(batch.all().len(), 4);
        let stack = board.get(batch.stacks[0]).unwrap();
        assert_eq!(stack.represented_count(), huge);
    }

    #[test]
    fn test_zero_creates_nothing() {
        let mut board = Board::new();
        let batch = create_tokens(&mut board, &soldier(), PlayerId::YOU, &Quantity::zero(), 5);
        assert!(batch.is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn test_copies_per_target() {
        let mut board = Board::new();
        let elf = board.add(Permanent::creature("Elf", 1, 1));
        let bear = board.add(Permanent::creature("Bear", 2, 2));
        let batch = create_copies(&mut board, &[elf, bear], PlayerId::YOU, &Quantity::from(2u64), 100).unwrap();

        let names: Vec<_> = batch.concrete.iter().map(|id| board.get(*id).unwrap().name.clone()).collect();
        assert_eq!(names, ["Elf", "Elf", "Bear", "Bear"]);
    }

    #[test]
    fn test_role_collapse() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let monster = TokenShape::role("Monster Role", StatBonus::new(1, 1));
        let royal = TokenShape::role("Royal Role", StatBonus::new(1, 1));

        let (first, _) = create_role(&mut board, &monster, PlayerId::YOU, host, &Quantity::one()).unwrap();
        let (second, log) = create_role(&mut board, &royal, PlayerId::YOU, host, &Quantity::one()).unwrap();

        let attached: Vec<_> = board.attachments_of(host).map(|p| p.id).collect();
        assert_eq!(attached, [second.unwrap()]);

        let first = board.get(first.unwrap()).unwrap();
        assert_eq!(first.zone, Zone::Graveyard);
        assert!(first.attached_to.is_none());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_other_controllers_role_survives() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let cursed = TokenShape::role("Cursed Role", StatBonus::new(-1, -1));
        let monster = TokenShape::role("Monster Role", StatBonus::new(1, 1));

        create_role(&mut board, &cursed, PlayerId(1), host, &Quantity::one()).unwrap();
        create_role(&mut board, &monster, PlayerId::YOU, host, &Quantity::one()).unwrap();
        assert_eq!(board.attachments_of(host).count(), 2);
    }

    #[test]
    fn test_doubled_role_materializes_once() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let monster = TokenShape::role("Monster Role", StatBonus::new(1, 1));

        let (role, log) = create_role(&mut board, &monster, PlayerId::YOU, host, &Quantity::from(4u64)).unwrap();
        assert!(role.is_some());
        assert_eq!(board.len(), 2);
        assert_eq!(log[0], "3 earlier Monster Role token(s) collapse immediately");
        assert_eq!(board.power(host).unwrap(), Quantity::from(3u64));
    }
}
