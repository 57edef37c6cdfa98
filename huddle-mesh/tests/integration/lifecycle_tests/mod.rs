mod test_media_toggle;
