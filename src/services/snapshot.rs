use crate::core::{DirectoryEntry, KeywordCatalog, Participant};
use crate::models::PartyKind;
use crate::services::store::{SelectionStore, StoreError};
use futures::future::join_all;

/// Everything one matching run reads, fetched before any scoring starts
#[derive(Debug)]
pub struct MatchSnapshot {
    pub catalog: KeywordCatalog,
    pub viewer: Participant,
    pub counterparties: Vec<Participant>,
    /// Counterparties whose selection could not be fetched
    pub failed: usize,
}

/// Load the viewer and every counterparty with their selections.
///
/// Counterparty selections are fetched concurrently. The snapshot is only
/// returned once all fetches have resolved; a counterparty whose fetch fails
/// is logged and left out. Errors on the viewer's own data fail the load.
pub async fn load_match_snapshot(
    store: &dyn SelectionStore,
    viewer_id: &str,
) -> Result<MatchSnapshot, StoreError> {
    let catalog = store.catalog().await?;
    let viewer_party = store.party(viewer_id).await?;
    let viewer_selection = store.selections(viewer_id).await?;
    let profiles = store.parties_of_kind(viewer_party.kind.counterpart()).await?;

    let fetches = profiles.into_iter().map(|profile| async move {
        let result = store.selections(&profile.party_id).await;
        (profile, result)
    });

    let mut counterparties = Vec::new();
    let mut failed = 0;
    for (profile, result) in join_all(fetches).await {
        match result {
            Ok(selection) => counterparties.push(Participant::new(profile, selection)),
            Err(e) => {
                tracing::warn!("Failed to fetch keywords for {}, skipping: {}", profile.party_id, e);
                failed += 1;
            }
        }
    }

    tracing::debug!(
        "Loaded {} counterparties for {} ({} failed)",
        counterparties.len(),
        viewer_id,
        failed
    );

    Ok(MatchSnapshot {
        catalog,
        viewer: Participant::new(viewer_party, viewer_selection),
        counterparties,
        failed,
    })
}

/// Load all parties of `kind` with their keywords resolved, for the directory.
///
/// A party whose selection cannot be fetched is logged and left out, as in
/// [`load_match_snapshot`].
pub async fn load_directory(
    store: &dyn SelectionStore,
    kind: PartyKind,
) -> Result<Vec<DirectoryEntry>, StoreError> {
    let catalog = store.catalog().await?;
    let profiles = store.parties_of_kind(kind).await?;

    let fetches = profiles.into_iter().map(|profile| async move {
        let result = store.selections(&profile.party_id).await;
        (profile, result)
    });

    let entries = join_all(fetches)
        .await
        .into_iter()
        .filter_map(|(profile, result)| match result {
            Ok(selection) => Some(DirectoryEntry::new(profile, &selection, &catalog)),
            Err(e) => {
                tracing::warn!("Failed to fetch keywords for {}, skipping: {}", profile.party_id, e);
                None
            }
        })
        .collect();

    Ok(entries)
}
