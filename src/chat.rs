//! Group chat with per-participant unread counters

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Directory;
use crate::types::{GroupId, Message, ParticipantId};

/// Posts messages to groups and tracks what each participant has not read
pub struct ChatManager<'a> {
    directory: &'a Directory,
    unread: RwLock<HashMap<ParticipantId, HashMap<GroupId, u32>>>,
}

impl<'a> ChatManager<'a> {
    pub fn new(directory: &'a Directory) -> Self {
        Self {
            directory,
            unread: RwLock::new(HashMap::new()),
        }
    }

    /// Post `content` to a group the sender belongs to or owns.
    ///
    /// Every other participant of the group gets one more unread message.
    pub fn send_group_message(&self, sender_id: &str, group_id: &str, content: &str) -> Result<()> {
        let recipients: Vec<ParticipantId> = {
            let mut tables = self.directory.write();
            tables.participants.require(sender_id)?;
            let group = tables.groups.require_mut(group_id)?;
            if !group.is_participant(sender_id) {
                return Err(Error::NotGroupMember {
                    participant_id: sender_id.to_string(),
                    group_id: group_id.to_string(),
                });
            }
            group.add_message(sender_id, content);

            std::iter::once(group.mentor_id())
                .chain(group.members().iter().map(String::as_str))
                .filter(|id| *id != sender_id)
                .map(str::to_string)
                .collect()
        };

        let mut unread = self.unread.write();
        for recipient in &recipients {
            *unread
                .entry(recipient.clone())
                .or_default()
                .entry(group_id.to_string())
                .or_insert(0) += 1;
        }

        debug!(
            sender = %sender_id,
            group = %group_id,
            recipients = recipients.len(),
            "Message posted"
        );
        Ok(())
    }

    /// Reset a participant's unread count for one group
    pub fn mark_read(&self, participant_id: &str, group_id: &str) {
        if let Some(groups) = self.unread.write().get_mut(participant_id) {
            groups.remove(group_id);
        }
    }

    pub fn unread_count(&self, participant_id: &str, group_id: &str) -> u32 {
        self.unread
            .read()
            .get(participant_id)
            .and_then(|groups| groups.get(group_id))
            .copied()
            .unwrap_or(0)
    }

    /// Total unread across all groups
    pub fn total_unread(&self, participant_id: &str) -> u32 {
        self.unread
            .read()
            .get(participant_id)
            .map(|groups| groups.values().sum())
            .unwrap_or(0)
    }

    /// Message history of a group; empty for an unknown group
    pub fn group_messages(&self, group_id: &str) -> Vec<Message> {
        self.directory
            .read()
            .groups
            .get(group_id)
            .map(|g| g.messages().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Participant, Profile, RoleKind};

    fn person(name: &str, kind: RoleKind) -> Participant {
        Participant::new(
            Profile {
                name: name.to_string(),
                email: format!("{}@student.monash", name.to_lowercase()),
                age: 21,
                location: "Clayton".to_string(),
                interests: vec![],
                background: "International".to_string(),
            },
            kind,
        )
    }

    /// Directory with one group: mentor `m`, members `a` and `b`, outsider `x`
    fn setup() -> (Directory, GroupId, [ParticipantId; 4]) {
        let directory = Directory::new();
        let m = person("M", RoleKind::Mentor);
        let a = person("A", RoleKind::Mentee);
        let b = person("B", RoleKind::Mentee);
        let x = person("X", RoleKind::Mentee);
        let ids = [m.id.clone(), a.id.clone(), b.id.clone(), x.id.clone()];
        let group_id = {
            let mut tables = directory.write();
            for p in [m, a, b, x] {
                tables.participants.insert(p);
            }
            let gid = tables.create_group_for(&ids[0], None).unwrap();
            tables.assign_to_group(&gid, &ids[1]).unwrap();
            tables.assign_to_group(&gid, &ids[2]).unwrap();
            gid
        };
        (directory, group_id, ids)
    }

    #[test]
    fn test_send_increments_unread_for_others() {
        let (directory, gid, [m, a, b, x]) = setup();
        let chat = ChatManager::new(&directory);

        chat.send_group_message(&a, &gid, "hi all").unwrap();

        assert_eq!(chat.unread_count(&a, &gid), 0);
        assert_eq!(chat.unread_count(&b, &gid), 1);
        assert_eq!(chat.unread_count(&m, &gid), 1);
        assert_eq!(chat.unread_count(&x, &gid), 0);
        assert_eq!(chat.group_messages(&gid).len(), 1);
        assert_eq!(chat.group_messages(&gid)[0].content, "hi all");
    }

    #[test]
    fn test_mentor_can_post() {
        let (directory, gid, [m, a, _, _]) = setup();
        let chat = ChatManager::new(&directory);
        chat.send_group_message(&m, &gid, "welcome").unwrap();
        chat.send_group_message(&m, &gid, "agenda").unwrap();
        assert_eq!(chat.unread_count(&a, &gid), 2);
        assert_eq!(chat.total_unread(&a), 2);
        assert_eq!(chat.unread_count(&m, &gid), 0);
    }

    #[test]
    fn test_outsider_rejected() {
        let (directory, gid, [.., x]) = setup();
        let chat = ChatManager::new(&directory);
        let err = chat.send_group_message(&x, &gid, "let me in").unwrap_err();
        assert!(matches!(err, Error::NotGroupMember { .. }));
        assert!(chat.group_messages(&gid).is_empty());
    }

    #[test]
    fn test_unknown_sender_and_group() {
        let (directory, gid, [_, a, ..]) = setup();
        let chat = ChatManager::new(&directory);
        assert!(matches!(
            chat.send_group_message("ghost", &gid, "boo"),
            Err(Error::ParticipantNotFound(_))
        ));
        assert!(matches!(
            chat.send_group_message(&a, "nope", "hi"),
            Err(Error::GroupNotFound(_))
        ));
        assert!(chat.group_messages("nope").is_empty());
    }

    #[test]
    fn test_mark_read() {
        let (directory, gid, [_, a, b, _]) = setup();
        let chat = ChatManager::new(&directory);
        chat.send_group_message(&a, &gid, "one").unwrap();
        chat.mark_read(&b, &gid);
        assert_eq!(chat.unread_count(&b, &gid), 0);
        chat.mark_read("nobody", &gid);
    }
}
