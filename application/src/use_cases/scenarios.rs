//! End-to-end dispatch scenarios against the assembled service.
//!
//! The decision service is scripted per lane (router, synthesis, agent name);
//! everything else runs for real: manifest validation, assembly, credential
//! scoping, routing, fan-out, trace recording and reload.
