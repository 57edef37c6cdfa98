mod test_joins_without_media;
