pub mod p900_tobacco_sales;
