mod test_candidate_buffering;
mod test_incoming_offer;
