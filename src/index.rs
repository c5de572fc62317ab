use tantivy::{
    Index, IndexReader, IndexWriter, TantivyDocument,
    schema::{FAST, Field, INDEXED, STORED, STRING, Schema, TEXT},
};

use crate::catalog::Product;
use crate::error::ShopError;

const HEAP_SIZE: usize = 50_000_000; // 50MB

/// Full-text index over the product catalog. The catalog is static for the
/// lifetime of the process, so the index lives in RAM and is rebuilt from
/// the catalog at startup.
pub struct SearchIndex {
    pub index: Index,
    reader: IndexReader,
    pub(crate) id_field: Field,
    pub(crate) category_field: Field,
    pub(crate) rating_field: Field,
    pub(crate) title_field: Field,
    pub(crate) content_field: Field,
}

impl SearchIndex {
    /// Create an empty in-memory index
    pub fn new_in_memory() -> Result<Self, ShopError> {
        let schema = Self::build_schema();
        let index = Index::create_in_ram(schema);
        Self::from_index(index)
    }

    /// Build an index over the full catalog
    pub fn build(products: &[Product]) -> Result<Self, ShopError> {
        let mut search_index = Self::new_in_memory()?;

        let mut writer = search_index.writer()?;
        search_index.index_products(&mut writer, products)?;
        writer.commit()?;
        search_index.reload_reader()?;

        Ok(search_index)
    }

    fn from_index(index: Index) -> Result<Self, ShopError> {
        let schema = index.schema();
        let reader = index.reader()?;

        Ok(Self {
            id_field: schema.get_field("id").unwrap(),
            category_field: schema.get_field("category").unwrap(),
            rating_field: schema.get_field("rating").unwrap(),
            title_field: schema.get_field("title").unwrap(),
            content_field: schema.get_field("content").unwrap(),
            index,
            reader,
        })
    }

    fn build_schema() -> Schema {
        let mut builder = Schema::builder();

        // Product identifier, stored for hit resolution
        builder.add_u64_field("id", INDEXED | STORED | FAST);

        // Exact category term
        builder.add_text_field("category", STRING | FAST);

        // Aggregate rating, used for minimum-rating filters
        builder.add_f64_field("rating", INDEXED | FAST);

        // Title indexed on its own so it can be queried directly
        builder.add_text_field("title", TEXT);

        // Full-text content (not stored, just indexed)
        builder.add_text_field("content", TEXT);

        builder.build()
    }

    pub fn writer(&self) -> Result<IndexWriter, ShopError> {
        Ok(self.index.writer(HEAP_SIZE)?)
    }

    pub fn reload_reader(&mut self) -> Result<(), ShopError> {
        self.reader.reload()?;
        Ok(())
    }

    pub fn searcher(&self) -> tantivy::Searcher {
        self.reader.searcher()
    }

    /// Index one document per product
    pub fn index_products(
        &self,
        writer: &mut IndexWriter,
        products: &[Product],
    ) -> Result<usize, ShopError> {
        let mut count = 0;

        for product in products {
            let mut doc = TantivyDocument::new();
            doc.add_u64(self.id_field, product.id);
            doc.add_text(self.category_field, &product.category);
            doc.add_f64(self.rating_field, product.rating.rate);
            doc.add_text(self.title_field, &product.title);
            doc.add_text(self.content_field, &searchable_text(product));

            writer.add_document(doc)?;
            count += 1;
        }

        Ok(count)
    }
}

/// Flatten the product's descriptive fields into one searchable string
fn searchable_text(product: &Product) -> String {
    [
        product.title.as_str(),
        product.description.as_str(),
        product.category.as_str(),
    ]
    .join(" ")
}
