use crate::error::{PurgeError, Result};
use crate::index::schema::{scope_collection_tag, DOCUMENT_ID_FIELD};
use crate::index::{IndexManager, IndexSchema};
use crate::purge::{MatchEvent, MatchHandler, SearchIndex};
use serde::{Deserialize, Serialize};
use tantivy::query::{AllQuery, BooleanQuery, EmptyQuery, EnableScoring, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, TantivyDocument, Value};
use tantivy::{DocSet, Term, TERMINATED};

/// Query accepted by the delete-by-query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeleteQuery {
    /// Exact match on a keyword field.
    Term { field: String, value: String },
    /// Any of the whitespace separated terms in title or content.
    Match { text: String },
    /// Every document tagged with the scope/collection pair.
    ScopeCollection { scope: String, collection: String },
    All,
}

impl DeleteQuery {
    pub fn build(&self, schema: &IndexSchema) -> Result<Box<dyn Query>> {
        match self {
            DeleteQuery::Term { field, value } => {
                let field = schema
                    .keyword_field(field)
                    .ok_or_else(|| PurgeError::InvalidQuery(format!("not a keyword field: {}", field)))?;
                Ok(term_query(field, value))
            }
            DeleteQuery::Match { text } => Ok(parse_query(text, schema)),
            DeleteQuery::ScopeCollection { scope, collection } => Ok(term_query(
                schema.scope_collection,
                &scope_collection_tag(scope, collection),
            )),
            DeleteQuery::All => Ok(Box::new(AllQuery)),
        }
    }
}

fn term_query(field: Field, value: &str) -> Box<dyn Query> {
    let term = Term::from_field_text(field, value);
    Box::new(TermQuery::new(term, IndexRecordOption::Basic))
}

fn parse_query(query_text: &str, schema: &IndexSchema) -> Box<dyn Query> {
    let terms: Vec<&str> = query_text.split_whitespace().collect();

    if terms.is_empty() {
        return Box::new(EmptyQuery {});
    }

    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

    for term in &terms {
        let term_text = term.to_lowercase();
        for field in [schema.title, schema.content] {
            clauses.push((Occur::Should, term_query(field, &term_text)));
        }
    }

    Box::new(BooleanQuery::new(clauses))
}

impl SearchIndex for IndexManager {
    type Query = dyn Query;

    /// Streams matches from a single searcher snapshot, segment by segment.
    /// Deletions committed while streaming are not seen by this pass.
    fn search_matches(&self, query: &Self::Query, handler: &mut dyn MatchHandler) -> Result<()> {
        let reader = self.reader()?;
        let searcher = reader.searcher();
        let weight = query.weight(EnableScoring::disabled_from_searcher(&searcher))?;
        let document_id = self.schema().document_id;

        for segment_reader in searcher.segment_readers() {
            let mut scorer = weight.scorer(segment_reader, 1.0)?;
            let alive_bitset = segment_reader.alive_bitset();
            // Indexes built before `document_id` was FAST fall back to the doc store.
            let id_column = segment_reader.fast_fields().str(DOCUMENT_ID_FIELD)?;
            let store_reader = match id_column {
                Some(_) => None,
                None => Some(segment_reader.get_store_reader(1)?),
            };
            let mut id = String::new();

            let mut doc = scorer.doc();
            while doc != TERMINATED {
                let alive = alive_bitset.map_or(true, |bitset| bitset.is_alive(doc));
                if alive {
                    id.clear();
                    let found = match (&id_column, &store_reader) {
                        (Some(column), _) => match column.term_ords(doc).next() {
                            Some(ord) => column.ord_to_str(ord, &mut id)?,
                            None => false,
                        },
                        (None, Some(store)) => {
                            let stored: TantivyDocument = store.get(doc)?;
                            match extract_field_value(&stored, document_id) {
                                Some(value) => {
                                    id.push_str(&value);
                                    true
                                }
                                None => false,
                            }
                        }
                        (None, None) => false,
                    };
                    if found {
                        handler.on_match(MatchEvent::Hit(&id))?;
                    }
                }
                doc = scorer.advance();
            }
        }

        handler.on_match(MatchEvent::End)
    }
}

pub(crate) fn extract_field_value(doc: &TantivyDocument, field: Field) -> Option<String> {
    doc.get_first(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}
