//! Contact operations

use std::collections::HashMap;

use serde_json::json;

use lr_http::HttpClient;

use crate::api::LineApiClient;
use crate::error::Result;
use crate::types::Contact;

impl<C: HttpClient> LineApiClient<C> {
    pub async fn block_contact(&self, mid: &str) -> Result<()> {
        self.call_unit("blockContact", json!({"reqSeq": 0, "id": mid}))
            .await
    }

    pub async fn unblock_contact(&self, mid: &str) -> Result<()> {
        self.call_unit("unblockContact", json!({"reqSeq": 0, "id": mid}))
            .await
    }

    /// Add a contact by mid; keyed by mid
    pub async fn find_and_add_contacts_by_mid(&self, mid: &str) -> Result<HashMap<String, Contact>> {
        self.call_as("findAndAddContactsByMid", json!({"reqSeq": 0, "mid": mid}))
            .await
    }

    /// Add a contact by user id; keyed by mid
    pub async fn find_and_add_contacts_by_userid(
        &self,
        userid: &str,
    ) -> Result<HashMap<String, Contact>> {
        self.call_as("findAndAddContactsByUserid", json!({"reqSeq": 0, "userid": userid}))
            .await
    }

    pub async fn find_contacts_by_userid(&self, userid: &str) -> Result<Contact> {
        self.call_as("findContactByUserid", json!({"userid": userid}))
            .await
    }

    pub async fn find_contact_by_ticket(&self, ticket_id: &str) -> Result<Contact> {
        self.call_as("findContactByUserTicket", json!({"ticketIdWithTag": ticket_id}))
            .await
    }

    pub async fn get_all_contact_ids(&self) -> Result<Vec<String>> {
        self.call_as("getAllContactIds", json!({})).await
    }

    pub async fn get_blocked_contact_ids(&self) -> Result<Vec<String>> {
        self.call_as("getBlockedContactIds", json!({})).await
    }

    pub async fn get_contact(&self, mid: &str) -> Result<Contact> {
        self.call_as("getContact", json!({"id": mid})).await
    }

    pub async fn get_contacts(&self, mids: &[String]) -> Result<Vec<Contact>> {
        self.call_as("getContacts", json!({"ids": mids})).await
    }

    pub async fn get_favorite_mids(&self) -> Result<Vec<String>> {
        self.call_as("getFavoriteMids", json!({})).await
    }

    pub async fn get_hidden_contact_mids(&self) -> Result<Vec<String>> {
        self.call_as("getHiddenContactMids", json!({})).await
    }
}
