pub mod csv_pipeline;
