mod caption_test;
mod uploaded_image_test;
