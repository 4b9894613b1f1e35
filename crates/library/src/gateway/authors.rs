use super::attempt::skip;
use super::{Gateway, OperationResult, Outcome, Snapshot};
use shelf_models::{Author, AuthorId, AuthorPatch, NewAuthor, next_id};
use tracing::instrument;

impl Gateway {
    /// Add an author.
    ///
    /// The draft gets the next free identifier and is cached straight away;
    /// if the remote catalog accepts it, its record (and identifier, if it
    /// sends one) replaces the draft.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_author(&self, draft: NewAuthor) -> OperationResult<Author> {
        self.ensure_seeded().await;
        let mut authors = self.local_authors().await;
        let books = self.local_books().await;
        let id = next_id(authors.iter().map(|a| a.id));
        let optimistic = draft.clone().with_id(id);
        authors.push(optimistic.clone());
        self.store.save_authors(&authors).await;

        let attempted = self.attempt("create_author", self.remote.create_author(&draft), async { optimistic.clone() }).await;
        let fallback_used = attempted.outcome.fallback_used();
        let entity = match attempted.outcome {
            Outcome::Remote(persisted) => {
                let mut reconciled = optimistic;
                reconciled.reconcile(persisted);
                replace(&mut authors, Some(id), &reconciled);
                self.store.save_authors(&authors).await;
                tracing::debug!(draft_id = id, id = ?reconciled.id, "Author reconciled with remote");
                reconciled
            },
            Outcome::Local(author) | Outcome::Fallback(author) => author,
        };
        let snapshot = self.settle(authors, books, attempted.elapsed, fallback_used).await;
        OperationResult { snapshot, entity }
    }

    /// Merge `patch` into an author.
    ///
    /// Without an identifier nothing is cached or sent; the patch applied to
    /// an empty record is handed back as-is.
    #[instrument(skip(self, patch))]
    pub async fn update_author(&self, id: Option<AuthorId>, patch: AuthorPatch) -> OperationResult<Author> {
        self.ensure_seeded().await;
        let mut authors = self.local_authors().await;
        let books = self.local_books().await;

        let mut merged = authors.iter().find(|a| id.is_some() && a.id == id).cloned().unwrap_or_default();
        merged.apply(&patch);
        merged.id = id;
        let Some(id) = id else {
            let attempted = skip(self.latency, "update_author", async { merged }).await;
            let snapshot = self.settle(authors, books, attempted.elapsed, false).await;
            return OperationResult { snapshot, entity: attempted.outcome.into_inner() };
        };
        replace(&mut authors, Some(id), &merged);
        self.store.save_authors(&authors).await;

        let payload = NewAuthor::from(&merged);
        let attempted = self.attempt("update_author", self.remote.update_author(id, &payload), async { merged.clone() }).await;
        let fallback_used = attempted.outcome.fallback_used();
        let entity = match attempted.outcome {
            Outcome::Remote(persisted) => {
                let mut reconciled = merged;
                reconciled.reconcile(persisted);
                replace(&mut authors, Some(id), &reconciled);
                self.store.save_authors(&authors).await;
                reconciled
            },
            Outcome::Local(author) | Outcome::Fallback(author) => author,
        };
        let snapshot = self.settle(authors, books, attempted.elapsed, fallback_used).await;
        OperationResult { snapshot, entity }
    }

    /// Remove an author and every book crediting them as primary author.
    ///
    /// The cache is updated before the remote catalog is told; the remote
    /// delete is best-effort.
    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: Option<AuthorId>) -> Snapshot {
        self.ensure_seeded().await;
        let mut authors = self.local_authors().await;
        let mut books = self.local_books().await;

        let Some(id) = id else {
            let attempted = skip(self.latency, "delete_author", async {}).await;
            return self.settle(authors, books, attempted.elapsed, false).await;
        };
        authors.retain(|a| a.id != Some(id));
        let before = books.len();
        books.retain(|b| b.author_id != id);
        tracing::debug!(id, cascaded = before - books.len(), "Author removed locally");
        self.store.save_all(&authors, &books).await;

        let attempted = self.attempt("delete_author", self.remote.delete_author(id), async {}).await;
        self.settle(authors, books, attempted.elapsed, attempted.outcome.fallback_used()).await
    }
}

fn replace(authors: &mut [Author], id: Option<AuthorId>, with: &Author) {
    for author in authors.iter_mut().filter(|a| a.id == id) {
        author.clone_from(with);
    }
}

#[cfg(test)]
mod tests {
    use crate::gateway::Snapshot;
    use crate::gateway::tests::{compact, offline, online};
    use rstest::rstest;
    use shelf_models::{AuthorPatch, BookPatch, NewAuthor, NewBook};

    #[track_caller]
    fn assert_resolvable(snapshot: &Snapshot) {
        for book in &snapshot.books {
            assert!(snapshot.author(book.author_id).is_some(), "{} lost its author", book.title);
        }
    }

    #[tokio::test]
    async fn test_create_reconciles_server_id() {
        let h = online().await;
        let result = h.gateway.create_author(NewAuthor::new("Jane Doe")).await;
        assert!(!result.meta().fallback_used);
        assert_eq!(result.entity.id, Some(101));
        assert_eq!(result.snapshot.authors.len(), 4);
        assert!(result.snapshot.author(4).is_none());
        assert_eq!(result.snapshot.author(101).unwrap().name, "Jane Doe");
        let cached = h.gateway.store().load_authors().await.unwrap();
        assert_eq!(cached, result.snapshot.authors);
    }

    #[tokio::test]
    async fn test_create_keeps_draft_id_when_server_omits_it() {
        let h = online().await;
        h.remote.set_omit_ids(true);
        let result = h.gateway.create_author(NewAuthor::new("Jane Doe")).await;
        assert!(!result.meta().fallback_used);
        assert_eq!(result.entity.id, Some(4));
    }

    #[tokio::test]
    async fn test_create_offline_keeps_draft() {
        let h = offline().await;
        let result = h.gateway.create_author(NewAuthor::new("Jane Doe")).await;
        assert!(result.meta().fallback_used);
        assert_eq!(result.entity.id, Some(4));
        assert_eq!(h.gateway.store().load_authors().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let h = offline().await;
        let patch = AuthorPatch { country: Some("United States".to_string()), ..Default::default() };
        let result = h.gateway.update_author(Some(2), patch).await;
        assert!(result.meta().fallback_used);
        assert_eq!(result.entity.name, "Octavia E. Butler");
        assert_eq!(result.entity.country, "United States");
        assert_eq!(result.snapshot.author(2), Some(&result.entity));
        assert_eq!(h.gateway.store().load_authors().await.unwrap()[1].country, "United States");
    }

    #[tokio::test]
    async fn test_update_online_sends_merged_record() {
        let h = online().await;
        let patch = AuthorPatch { birth_year: Some(1947), ..Default::default() };
        let result = h.gateway.update_author(Some(2), patch).await;
        assert!(!result.meta().fallback_used);
        let remote = h.remote.authors().await;
        assert_eq!(remote[1].name, "Octavia E. Butler");
        assert_eq!(remote[1].birth_year, 1947);
        assert_eq!(result.entity, remote[1]);
    }

    #[tokio::test]
    async fn test_update_without_id_skips_remote() {
        let h = online().await;
        let patch = AuthorPatch { name: Some("Nobody".to_string()), ..Default::default() };
        let result = h.gateway.update_author(None, patch).await;
        assert!(!result.meta().fallback_used);
        assert_eq!(result.entity.id, None);
        assert_eq!(result.entity.name, "Nobody");
        assert_eq!(result.snapshot.authors, compact().authors);
        assert_eq!(h.remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_books() {
        let h = offline().await;
        let snapshot = h.gateway.delete_author(Some(2)).await;
        assert!(snapshot.meta.fallback_used);
        assert_eq!(snapshot.authors.len(), 2);
        assert_eq!(snapshot.books.len(), 3);
        for book in &snapshot.books {
            assert!(snapshot.author(book.author_id).is_some(), "{} lost its author", book.title);
        }
        assert_eq!(h.gateway.store().load_books().await, Some(snapshot.books));
    }

    #[tokio::test]
    async fn test_delete_online() {
        let h = online().await;
        let snapshot = h.gateway.delete_author(Some(3)).await;
        assert!(!snapshot.meta.fallback_used);
        assert!(snapshot.books.iter().all(|b| b.author_id != 3));
        assert_eq!(h.remote.authors().await.len(), 2);
    }

    #[rstest]
    #[case::offline(false)]
    #[case::online(true)]
    #[tokio::test]
    async fn test_books_stay_resolvable_through_deletes(#[case] connected: bool) {
        let h = if connected { online().await } else { offline().await };
        let jane = h.gateway.create_author(NewAuthor::new("Jane Doe")).await.entity.id.unwrap();
        h.gateway.create_book(NewBook::new("First Light", jane)).await;
        let result = h.gateway.create_book(NewBook::new("Second Light", jane)).await;
        assert_resolvable(&result.snapshot);

        let moved = h.gateway.update_book(Some(3), BookPatch { author_id: Some(jane), ..Default::default() }).await;
        assert_eq!(moved.entity.author_id, jane);
        assert_resolvable(&moved.snapshot);

        let mut last = moved.snapshot;
        let ids: Vec<_> = last.authors.iter().filter_map(|a| a.id).collect();
        for id in ids {
            let snapshot = h.gateway.delete_author(Some(id)).await;
            assert!(snapshot.author(id).is_none());
            assert!(snapshot.books.iter().all(|b| b.author_id != id));
            assert_resolvable(&snapshot);
            assert_eq!(h.gateway.store().load_books().await.as_ref(), Some(&snapshot.books));
            last = snapshot;
        }
        // Jane goes last, taking her books and the moved one with her.
        assert!(last.authors.is_empty());
        assert!(last.books.is_empty());
    }
}
