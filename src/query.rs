use std::ops::Bound;

use tantivy::{
    Term,
    collector::TopDocs,
    query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, RangeQuery, TermQuery},
    schema::{IndexRecordOption, Value},
};

use crate::error::ShopError;
use crate::index::SearchIndex;

/// A single search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub product_id: u64,
    pub score: f32,
}

/// Query builder and executor
pub struct QueryEngine<'a> {
    index: &'a SearchIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self { index }
    }

    /// Free-text search across titles and descriptions
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<SearchHit>, ShopError> {
        let query = self.text_query(query_str)?;

        let searcher = self.index.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        self.collect_hits(&searcher, top_docs)
    }

    /// All products in an exact category
    pub fn search_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ShopError> {
        let term = Term::from_field_text(self.index.category_field, category);
        let query = TermQuery::new(term, IndexRecordOption::Basic);

        let searcher = self.index.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        self.collect_hits(&searcher, top_docs)
    }

    /// Combined filter: optional free text, exact category and minimum
    /// rating. With no criteria at all, every product matches.
    pub fn search_filtered(
        &self,
        text: Option<&str>,
        category: Option<&str>,
        min_rating: Option<f64>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ShopError> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            clauses.push((Occur::Must, self.text_query(text)?));
        }

        if let Some(category) = category {
            let term = Term::from_field_text(self.index.category_field, category);
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
            ));
        }

        if let Some(min_rating) = min_rating {
            let lower = Bound::Included(Term::from_field_f64(self.index.rating_field, min_rating));
            clauses.push((
                Occur::Must,
                Box::new(RangeQuery::new(lower, Bound::Unbounded)),
            ));
        }

        let searcher = self.index.searcher();
        let top_docs = if clauses.is_empty() {
            searcher.search(&AllQuery, &TopDocs::with_limit(limit))?
        } else {
            searcher.search(&BooleanQuery::new(clauses), &TopDocs::with_limit(limit))?
        };

        self.collect_hits(&searcher, top_docs)
    }

    fn text_query(&self, query_str: &str) -> Result<Box<dyn Query>, ShopError> {
        let parser = QueryParser::for_index(
            &self.index.index,
            vec![self.index.title_field, self.index.content_field],
        );
        Ok(parser.parse_query(query_str)?)
    }

    fn collect_hits(
        &self,
        searcher: &tantivy::Searcher,
        top_docs: Vec<(f32, tantivy::DocAddress)>,
    ) -> Result<Vec<SearchHit>, ShopError> {
        let mut hits = Vec::with_capacity(top_docs.len());

        for (score, doc_addr) in top_docs {
            let doc: tantivy::TantivyDocument = searcher.doc(doc_addr)?;

            let product_id = doc
                .get_first(self.index.id_field)
                .and_then(|v| v.as_u64())
                .unwrap_or(0);

            hits.push(SearchHit { product_id, score });
        }

        Ok(hits)
    }
}
