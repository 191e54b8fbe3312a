pub mod d400_sales_summary;
pub mod p900_tobacco_sales;

#[cfg(test)]
pub(crate) mod test_support;
