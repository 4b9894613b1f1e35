use super::attempt::skip;
use super::{Gateway, OperationResult, Outcome, Snapshot};
use shelf_models::{Book, BookId, BookPatch, NewBook, next_id};
use tracing::instrument;

impl Gateway {
    /// Add a book. Same optimistic flow as
    /// [`create_author`](Gateway::create_author).
    #[instrument(skip_all, fields(title = %draft.title, author_id = draft.author_id))]
    pub async fn create_book(&self, draft: NewBook) -> OperationResult<Book> {
        self.ensure_seeded().await;
        let authors = self.local_authors().await;
        let mut books = self.local_books().await;
        let id = next_id(books.iter().map(|b| b.id));
        let optimistic = draft.clone().with_id(id);
        books.push(optimistic.clone());
        self.store.save_books(&books).await;

        let attempted = self.attempt("create_book", self.remote.create_book(&draft), async { optimistic.clone() }).await;
        let fallback_used = attempted.outcome.fallback_used();
        let entity = match attempted.outcome {
            Outcome::Remote(persisted) => {
                let mut reconciled = optimistic;
                reconciled.reconcile(persisted);
                replace(&mut books, Some(id), &reconciled);
                self.store.save_books(&books).await;
                tracing::debug!(draft_id = id, id = ?reconciled.id, "Book reconciled with remote");
                reconciled
            },
            Outcome::Local(book) | Outcome::Fallback(book) => book,
        };
        let snapshot = self.settle(authors, books, attempted.elapsed, fallback_used).await;
        OperationResult { snapshot, entity }
    }

    /// Merge `patch` into a book.
    #[instrument(skip(self, patch))]
    pub async fn update_book(&self, id: Option<BookId>, patch: BookPatch) -> OperationResult<Book> {
        self.ensure_seeded().await;
        let authors = self.local_authors().await;
        let mut books = self.local_books().await;

        let mut merged = books.iter().find(|b| id.is_some() && b.id == id).cloned().unwrap_or_default();
        merged.apply(&patch);
        merged.id = id;
        let Some(id) = id else {
            let attempted = skip(self.latency, "update_book", async { merged }).await;
            let snapshot = self.settle(authors, books, attempted.elapsed, false).await;
            return OperationResult { snapshot, entity: attempted.outcome.into_inner() };
        };
        replace(&mut books, Some(id), &merged);
        self.store.save_books(&books).await;

        let payload = NewBook::from(&merged);
        let attempted = self.attempt("update_book", self.remote.update_book(id, &payload), async { merged.clone() }).await;
        let fallback_used = attempted.outcome.fallback_used();
        let entity = match attempted.outcome {
            Outcome::Remote(persisted) => {
                let mut reconciled = merged;
                reconciled.reconcile(persisted);
                replace(&mut books, Some(id), &reconciled);
                self.store.save_books(&books).await;
                reconciled
            },
            Outcome::Local(book) | Outcome::Fallback(book) => book,
        };
        let snapshot = self.settle(authors, books, attempted.elapsed, fallback_used).await;
        OperationResult { snapshot, entity }
    }

    /// Remove a book. Unknown identifiers leave both collections untouched.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: Option<BookId>) -> Snapshot {
        self.ensure_seeded().await;
        let authors = self.local_authors().await;
        let mut books = self.local_books().await;

        let Some(id) = id else {
            let attempted = skip(self.latency, "delete_book", async {}).await;
            return self.settle(authors, books, attempted.elapsed, false).await;
        };
        books.retain(|b| b.id != Some(id));
        self.store.save_books(&books).await;

        let attempted = self.attempt("delete_book", self.remote.delete_book(id), async {}).await;
        self.settle(authors, books, attempted.elapsed, attempted.outcome.fallback_used()).await
    }
}

fn replace(books: &mut [Book], id: Option<BookId>, with: &Book) {
    for book in books.iter_mut().filter(|b| b.id == id) {
        book.clone_from(with);
    }
}
