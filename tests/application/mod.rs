mod caption_pipeline_test;
