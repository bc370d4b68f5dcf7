//! Moving permanents off the battlefield and attaching them.
//!
//! Leaving the battlefield cleans up attachments in both directions:
//!
//! - the leaving permanent is detached from its own host
//! - Equipment attached to it stays on the battlefield, unattached
//! - Auras (including Roles) attached to it go to the graveyard, unattached
//!
//! Both functions edit a board in place; executors call them on their own
//! copy of the caller's snapshot.

use super::Zone;
use crate::core::{Board, EngineError, PermanentId};

/// Move a battlefield permanent to another zone. Returns log lines.
///
/// Permanents already off the battlefield are left alone.
pub fn leave_battlefield(
    board: &mut Board,
    id: PermanentId,
    destination: Zone,
) -> Result<Vec<String>, EngineError> {
    let mut log = Vec::new();

    let permanent = board.get_mut(id).ok_or(EngineError::UnknownPermanent(id))?;
    if !permanent.on_battlefield() {
        return Ok(log);
    }
    permanent.zone = destination;
    permanent.attached_to = None;
    permanent.tapped = false;
    permanent.clear_end_of_turn();
    log.push(format!("{} moves to {}", permanent.name, destination));

    let attachments: Vec<PermanentId> = board.attachments_of(id).map(|p| p.id).collect();
    for attachment_id in attachments {
        let Some(attachment) = board.get_mut(attachment_id) else {
            continue;
        };
        attachment.attached_to = None;
        if attachment.is_aura() {
            attachment.zone = Zone::Graveyard;
            log.push(format!("{} is put into the graveyard", attachment.name));
        } else {
            attachment.zone = Zone::Battlefield;
            log.push(format!("{} becomes unattached", attachment.name));
        }
    }

    Ok(log)
}

/// Attach a permanent to a host on the battlefield.
///
/// Auras move to the `Attached` zone; Equipment stays in `Battlefield`.
pub fn attach(board: &mut Board, attacher: PermanentId, host: PermanentId) -> Result<(), EngineError> {
    if !board.is_on_battlefield(host) {
        return Err(EngineError::UnknownPermanent(host));
    }
    let permanent = board
        .get_mut(attacher)
        .filter(|p| p.on_battlefield())
        .ok_or(EngineError::UnknownPermanent(attacher))?;

    permanent.attached_to = Some(host);
    if permanent.is_aura() {
        permanent.zone = Zone::Attached;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Permanent, StatBonus, TokenShape};
    use crate::core::PlayerId;

    fn monster_role() -> Permanent {
        Permanent::from_shape(&TokenShape::role("Monster Role", StatBonus::new(1, 1)), PlayerId::YOU)
    }

    #[test]
    fn test_removal_cleans_up_attachments() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let sword = board.add(Permanent::equipment("Sword"));
        let role = board.add(monster_role());
        attach(&mut board, sword, host).unwrap();
        attach(&mut board, role, host).unwrap();
        assert_eq!(board.get(role).unwrap().zone, Zone::Attached);

        let log = leave_battlefield(&mut board, host, Zone::Graveyard).unwrap();
        assert_eq!(log.len(), 3);

        let sword = board.get(sword).unwrap();
        assert_eq!(sword.zone, Zone::Battlefield);
        assert!(sword.attached_to.is_none());

        let role = board.get(role).unwrap();
        assert_eq!(role.zone, Zone::Graveyard);
        assert!(role.attached_to.is_none());
    }

    #[test]
    fn test_removed_attachment_detaches_itself() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let sword = board.add(Permanent::equipment("Sword").attached_to(host));

        leave_battlefield(&mut board, sword, Zone::Exile).unwrap();
        let sword = board.get(sword).unwrap();
        assert_eq!(sword.zone, Zone::Exile);
        assert!(sword.attached_to.is_none());
        assert_eq!(board.attachments_of(host).count(), 0);
    }

    #[test]
    fn test_leaving_twice_is_noop() {
        let mut board = Board::new();
        let bear = board.add(Permanent::creature("Bear", 2, 2));
        leave_battlefield(&mut board, bear, Zone::Graveyard).unwrap();
        let log = leave_battlefield(&mut board, bear, Zone::Exile).unwrap();
        assert!(log.is_empty());
        assert_eq!(board.get(bear).unwrap().zone, Zone::Graveyard);
    }

    #[test]
    fn test_attach_requires_battlefield_host() {
        let mut board = Board::new();
        let host = board.add(Permanent::creature("Host", 2, 2));
        let sword = board.add(Permanent::equipment("Sword"));
        leave_battlefield(&mut board, host, Zone::Graveyard).unwrap();

        assert!(attach(&mut board, sword, host).is_err());
        assert!(attach(&mut board, sword, PermanentId(50)).is_err());
    }
}
