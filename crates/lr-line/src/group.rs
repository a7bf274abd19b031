//! Group and room operations

use serde_json::json;

use lr_http::HttpClient;

use crate::api::LineApiClient;
use crate::error::Result;
use crate::types::{Group, Room};

impl<C: HttpClient> LineApiClient<C> {
    // Group

    pub async fn accept_group_invitation(&self, group_id: &str) -> Result<()> {
        self.call_unit("acceptGroupInvitation", json!({"reqSeq": 0, "groupId": group_id}))
            .await
    }

    pub async fn accept_group_invitation_by_ticket(
        &self,
        group_id: &str,
        ticket_id: &str,
    ) -> Result<()> {
        self.call_unit(
            "acceptGroupInvitationByTicket",
            json!({"reqSeq": 0, "groupId": group_id, "ticketId": ticket_id}),
        )
        .await
    }

    pub async fn cancel_group_invitation(&self, group_id: &str, contact_ids: &[String]) -> Result<()> {
        self.call_unit(
            "cancelGroupInvitation",
            json!({"reqSeq": 0, "groupId": group_id, "contactIds": contact_ids}),
        )
        .await
    }

    pub async fn create_group(&self, name: &str, mids: &[String]) -> Result<Group> {
        self.call_as(
            "createGroup",
            json!({"seq": 0, "name": name, "contactIds": mids}),
        )
        .await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group> {
        self.call_as("getGroup", json!({"groupId": group_id})).await
    }

    pub async fn get_groups(&self, group_ids: &[String]) -> Result<Vec<Group>> {
        self.call_as("getGroups", json!({"groupIds": group_ids})).await
    }

    pub async fn get_group_ids_invited(&self) -> Result<Vec<String>> {
        self.call_as("getGroupIdsInvited", json!({})).await
    }

    pub async fn get_group_ids_joined(&self) -> Result<Vec<String>> {
        self.call_as("getGroupIdsJoined", json!({})).await
    }

    pub async fn invite_into_group(&self, group_id: &str, mids: &[String]) -> Result<()> {
        self.call_unit(
            "inviteIntoGroup",
            json!({"reqSeq": 0, "groupId": group_id, "contactIds": mids}),
        )
        .await
    }

    pub async fn kickout_from_group(&self, group_id: &str, mids: &[String]) -> Result<()> {
        self.call_unit(
            "kickoutFromGroup",
            json!({"reqSeq": 0, "groupId": group_id, "contactIds": mids}),
        )
        .await
    }

    pub async fn leave_group(&self, group_id: &str) -> Result<()> {
        self.call_unit("leaveGroup", json!({"reqSeq": 0, "groupId": group_id}))
            .await
    }

    pub async fn reject_group_invitation(&self, group_id: &str) -> Result<()> {
        self.call_unit("rejectGroupInvitation", json!({"reqSeq": 0, "groupId": group_id}))
            .await
    }

    /// Issue a new invitation ticket; returns the ticket id
    pub async fn reissue_group_ticket(&self, group_id: &str) -> Result<String> {
        self.call_as("reissueGroupTicket", json!({"groupId": group_id}))
            .await
    }

    pub async fn update_group(&self, group: &Group) -> Result<()> {
        self.call_unit("updateGroup", json!({"reqSeq": 0, "group": group}))
            .await
    }

    // Room

    pub async fn create_room(&self, mids: &[String]) -> Result<Room> {
        self.call_as("createRoom", json!({"reqSeq": 0, "contactIds": mids}))
            .await
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Room> {
        self.call_as("getRoom", json!({"roomId": room_id})).await
    }

    pub async fn invite_into_room(&self, room_id: &str, mids: &[String]) -> Result<()> {
        self.call_unit(
            "inviteIntoRoom",
            json!({"reqSeq": 0, "roomId": room_id, "contactIds": mids}),
        )
        .await
    }

    pub async fn leave_room(&self, room_id: &str) -> Result<()> {
        self.call_unit("leaveRoom", json!({"reqSeq": 0, "roomId": room_id}))
            .await
    }
}
